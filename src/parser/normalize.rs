//! Shared normalization helpers
//!
//! Decoders emit canonical records directly; the validation and
//! default-filling logic they share lives here: port coercion and range
//! checks, percent-decoding of labels and credentials, query-parameter
//! extraction, and fallback naming.

use std::borrow::Cow;

use url::Url;

use crate::parser::error::ParseError;
use crate::profile::record::ProxyKind;

// ============================================================================
// Port Validation
// ============================================================================

/// Checks a numeric port against the valid 1-65535 range.
pub fn port_in_range(value: i64) -> Result<u16, ParseError> {
    if (1..=65535).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ParseError::InvalidPort(value.to_string()))
    }
}

/// Parses a port from text and range-checks it.
pub fn port_from_text(raw: &str) -> Result<u16, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::InvalidPort("missing".to_string()));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ParseError::InvalidPort(trimmed.to_string()))?;
    port_in_range(value)
}

/// Requires a port in a parsed URI authority.
///
/// `Url` already range-checks ports during parsing, so the only values left
/// to reject here are an absent port and the reserved port 0.
pub fn require_port(port: Option<u16>) -> Result<u16, ParseError> {
    match port {
        Some(0) => Err(ParseError::InvalidPort("0".to_string())),
        Some(port) => Ok(port),
        None => Err(ParseError::InvalidPort("missing".to_string())),
    }
}

/// Maps a URI parse failure onto the conversion taxonomy.
///
/// The `url` crate rejects out-of-range and non-numeric ports at parse time;
/// those surface as `InvalidPort` so callers see the same kind regardless of
/// which layer caught the bad port.
pub fn map_url_error(error: url::ParseError) -> ParseError {
    match error {
        url::ParseError::InvalidPort => {
            ParseError::InvalidPort("invalid or out of range".to_string())
        }
        other => ParseError::MalformedUri(other.to_string()),
    }
}

// ============================================================================
// Host and Label Handling
// ============================================================================

/// Strips the square brackets a URI authority puts around IPv6 literals.
pub fn strip_ipv6_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host)
}

/// Extracts a non-empty host from a parsed URI.
pub fn host_from_url(url: &Url) -> Result<String, ParseError> {
    let host = url
        .host_str()
        .ok_or_else(|| ParseError::MalformedUri("missing host".to_string()))?;
    let host = strip_ipv6_brackets(host);
    if host.is_empty() {
        return Err(ParseError::MalformedUri("missing host".to_string()));
    }
    Ok(host.to_string())
}

/// Percent-decodes a fragment or label, keeping the raw text when the
/// encoding is broken.
pub fn decode_label(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Percent-decodes a non-empty credential from a URI userinfo segment.
pub fn require_credential(raw: &str) -> Result<String, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::EmptyCredential);
    }
    let decoded = urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string());
    Ok(decoded)
}

/// Resolves the display name, generating `<kind>-<server>:<port>` when the
/// source label is absent or blank.
pub fn resolve_name(label: Option<String>, kind: ProxyKind, server: &str, port: u16) -> String {
    match label {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ => format!("{kind}-{server}:{port}"),
    }
}

/// Drops empty strings so downstream fallbacks treat them like absent values.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

// ============================================================================
// Query Extraction
// ============================================================================

/// Query parameters recognized on `vless://` and `trojan://` links.
///
/// The first occurrence of a key wins and empty values count as absent,
/// matching how the source links are produced. Unknown keys are ignored.
#[derive(Debug, Default, Clone)]
pub struct LinkQuery {
    pub transport: Option<String>,
    pub security: Option<String>,
    pub path: Option<String>,
    pub host: Option<String>,
    pub sni: Option<String>,
    pub flow: Option<String>,
    pub allow_insecure: bool,
}

impl LinkQuery {
    pub fn from_url(url: &Url) -> Self {
        let mut query = Self::default();
        for (key, value) in url.query_pairs() {
            let value = value.into_owned();
            match key.as_ref() {
                "type" => set_first(&mut query.transport, value),
                "security" => set_first(&mut query.security, value),
                "path" => set_first(&mut query.path, value),
                "host" => set_first(&mut query.host, value),
                "sni" => set_first(&mut query.sni, value),
                "flow" => set_first(&mut query.flow, value),
                "allowInsecure" => {
                    query.allow_insecure =
                        query.allow_insecure || matches!(value.as_str(), "1" | "true");
                }
                _ => {}
            }
        }
        query
    }
}

fn set_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_in_range_accepts_bounds() {
        assert_eq!(port_in_range(1).unwrap(), 1);
        assert_eq!(port_in_range(65535).unwrap(), 65535);
    }

    #[test]
    fn test_port_in_range_rejects_out_of_range() {
        assert!(matches!(port_in_range(0), Err(ParseError::InvalidPort(_))));
        assert!(matches!(port_in_range(65536), Err(ParseError::InvalidPort(_))));
        assert!(matches!(port_in_range(-1), Err(ParseError::InvalidPort(_))));
    }

    #[test]
    fn test_port_from_text() {
        assert_eq!(port_from_text("443").unwrap(), 443);
        assert_eq!(port_from_text(" 8080 ").unwrap(), 8080);
    }

    #[test]
    fn test_port_from_text_rejects_non_numeric() {
        let error = port_from_text("https").unwrap_err();
        assert_eq!(error, ParseError::InvalidPort("https".to_string()));
    }

    #[test]
    fn test_port_from_text_rejects_empty() {
        let error = port_from_text("   ").unwrap_err();
        assert_eq!(error, ParseError::InvalidPort("missing".to_string()));
    }

    #[test]
    fn test_require_port() {
        assert_eq!(require_port(Some(443)).unwrap(), 443);
        assert!(matches!(require_port(Some(0)), Err(ParseError::InvalidPort(_))));
        assert_eq!(
            require_port(None).unwrap_err(),
            ParseError::InvalidPort("missing".to_string())
        );
    }

    #[test]
    fn test_map_url_error_distinguishes_ports() {
        assert!(matches!(
            map_url_error(url::ParseError::InvalidPort),
            ParseError::InvalidPort(_)
        ));
        assert!(matches!(
            map_url_error(url::ParseError::EmptyHost),
            ParseError::MalformedUri(_)
        ));
    }

    #[test]
    fn test_strip_ipv6_brackets() {
        assert_eq!(strip_ipv6_brackets("[2001:db8::1]"), "2001:db8::1");
        assert_eq!(strip_ipv6_brackets("example.com"), "example.com");
        assert_eq!(strip_ipv6_brackets("[unclosed"), "[unclosed");
    }

    #[test]
    fn test_host_from_url() {
        let url = Url::parse("trojan://secret@example.com:443").unwrap();
        assert_eq!(host_from_url(&url).unwrap(), "example.com");

        let url = Url::parse("trojan://secret@[2001:db8::1]:443").unwrap();
        assert_eq!(host_from_url(&url).unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_decode_label() {
        assert_eq!(decode_label("hong%20kong%2001"), "hong kong 01");
        assert_eq!(decode_label("plain"), "plain");
        // Broken percent sequences fall back to the raw text.
        assert_eq!(decode_label("bad%zz"), "bad%zz");
    }

    #[test]
    fn test_require_credential() {
        assert_eq!(require_credential("uuid-here").unwrap(), "uuid-here");
        assert_eq!(require_credential("p%40ss").unwrap(), "p@ss");
        assert_eq!(require_credential("").unwrap_err(), ParseError::EmptyCredential);
    }

    #[test]
    fn test_resolve_name_prefers_label() {
        let name = resolve_name(
            Some("  my node  ".to_string()),
            ProxyKind::Vless,
            "example.com",
            443,
        );
        assert_eq!(name, "my node");
    }

    #[test]
    fn test_resolve_name_generates_fallback() {
        let name = resolve_name(None, ProxyKind::Trojan, "example.com", 8443);
        assert_eq!(name, "trojan-example.com:8443");

        let name = resolve_name(Some("   ".to_string()), ProxyKind::Vmess, "10.0.0.1", 80);
        assert_eq!(name, "vmess-10.0.0.1:80");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_link_query_extracts_known_keys() {
        let url = Url::parse(
            "vless://uuid@h:443?type=ws&security=tls&path=%2Fray&host=sub.example.com&sni=sub.example.com&flow=xtls-rprx-vision",
        )
        .unwrap();
        let query = LinkQuery::from_url(&url);
        assert_eq!(query.transport.as_deref(), Some("ws"));
        assert_eq!(query.security.as_deref(), Some("tls"));
        assert_eq!(query.path.as_deref(), Some("/ray"));
        assert_eq!(query.host.as_deref(), Some("sub.example.com"));
        assert_eq!(query.sni.as_deref(), Some("sub.example.com"));
        assert_eq!(query.flow.as_deref(), Some("xtls-rprx-vision"));
        assert!(!query.allow_insecure);
    }

    #[test]
    fn test_link_query_ignores_unknown_keys() {
        let url = Url::parse("trojan://pw@h:443?sni=a.example.com&fp=chrome&alpn=h2").unwrap();
        let query = LinkQuery::from_url(&url);
        assert_eq!(query.sni.as_deref(), Some("a.example.com"));
        assert!(query.transport.is_none());
    }

    #[test]
    fn test_link_query_first_occurrence_wins() {
        let url = Url::parse("trojan://pw@h:443?sni=first.example.com&sni=second.example.com").unwrap();
        let query = LinkQuery::from_url(&url);
        assert_eq!(query.sni.as_deref(), Some("first.example.com"));
    }

    #[test]
    fn test_link_query_treats_empty_values_as_absent() {
        let url = Url::parse("trojan://pw@h:443?sni=&path=").unwrap();
        let query = LinkQuery::from_url(&url);
        assert!(query.sni.is_none());
        assert!(query.path.is_none());
    }

    #[test]
    fn test_link_query_allow_insecure_flag() {
        let url = Url::parse("trojan://pw@h:443?allowInsecure=1").unwrap();
        assert!(LinkQuery::from_url(&url).allow_insecure);

        let url = Url::parse("trojan://pw@h:443?allowInsecure=true").unwrap();
        assert!(LinkQuery::from_url(&url).allow_insecure);

        let url = Url::parse("trojan://pw@h:443?allowInsecure=0").unwrap();
        assert!(!LinkQuery::from_url(&url).allow_insecure);
    }
}
