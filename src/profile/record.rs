//! Canonical proxy record produced by the decoders.
//!
//! Every share-link scheme is normalized into the same [`ProxyRecord`] shape
//! at decode time, so the serializer and any reporting code only ever deal
//! with one representation. Records are constructed exclusively by the
//! decoders, after validation; a record that exists is a valid record.

use std::fmt;

use serde::Serialize;

// ============================================================================
// Proxy Kind
// ============================================================================

/// Supported share-link schemes.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Vmess,
    Vless,
    Trojan,
}

impl ProxyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyKind::Vmess => "vmess",
            ProxyKind::Vless => "vless",
            ProxyKind::Trojan => "trojan",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Stream transport beneath the proxy protocol.
///
/// Share links carry this as a free-form string (`net` in vmess JSON, the
/// `type` query parameter in URI schemes); it is canonicalized into this
/// closed set, with unrecognized labels falling back to plain TCP.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Ws,
    Grpc,
    H2,
}

impl Transport {
    /// Canonicalize a transport label from a share link.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "ws" | "websocket" => Transport::Ws,
            "grpc" => Transport::Grpc,
            "h2" | "http2" => Transport::H2,
            _ => Transport::Tcp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Ws => "ws",
            Transport::Grpc => "grpc",
            Transport::H2 => "h2",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Record Sub-structures
// ============================================================================

/// TLS settings attached to a record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// Whether the connection is wrapped in TLS.
    pub enabled: bool,

    /// SNI / server name to present, when the link specifies one.
    pub server_name: Option<String>,

    /// Skip certificate verification (trojan `allowInsecure`).
    pub insecure_skip_verify: bool,
}

/// Transport-specific settings; which fields apply depends on the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// WebSocket/h2 path, or the gRPC service name.
    pub path: Option<String>,

    /// Host header for ws/h2 transports.
    pub host: Option<String>,
}

// ============================================================================
// Proxy Record
// ============================================================================

/// One decoded proxy configuration, scheme-agnostic.
///
/// Invariants: `server` and `credential` are non-empty and `port` is within
/// 1–65535; decoders fail with a typed error instead of emitting a record
/// that violates them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyRecord {
    pub kind: ProxyKind,

    /// Display label, from the link's `ps`/fragment, or the generated
    /// `<kind>-<server>:<port>` fallback.
    pub name: String,

    pub server: String,

    pub port: u16,

    /// UUID for vmess/vless, password for trojan.
    pub credential: String,

    pub transport: Transport,

    pub tls: TlsOptions,

    pub transport_opts: TransportOptions,

    /// vmess alterId; 0 for other kinds.
    pub alter_id: u32,

    /// vmess cipher (`scy`); "auto" unless the link overrides it.
    pub cipher: String,

    /// vless flow control label, when the link carries one.
    pub flow: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_kind_as_str() {
        assert_eq!(ProxyKind::Vmess.as_str(), "vmess");
        assert_eq!(ProxyKind::Vless.as_str(), "vless");
        assert_eq!(ProxyKind::Trojan.as_str(), "trojan");
    }

    #[test]
    fn test_proxy_kind_display() {
        assert_eq!(format!("{}", ProxyKind::Trojan), "trojan");
    }

    #[test]
    fn test_transport_from_label_known() {
        assert_eq!(Transport::from_label("tcp"), Transport::Tcp);
        assert_eq!(Transport::from_label("ws"), Transport::Ws);
        assert_eq!(Transport::from_label("websocket"), Transport::Ws);
        assert_eq!(Transport::from_label("grpc"), Transport::Grpc);
        assert_eq!(Transport::from_label("h2"), Transport::H2);
        assert_eq!(Transport::from_label("http2"), Transport::H2);
    }

    #[test]
    fn test_transport_from_label_case_insensitive() {
        assert_eq!(Transport::from_label("WS"), Transport::Ws);
        assert_eq!(Transport::from_label("GRPC"), Transport::Grpc);
    }

    #[test]
    fn test_transport_from_label_unknown_falls_back_to_tcp() {
        assert_eq!(Transport::from_label("kcp"), Transport::Tcp);
        assert_eq!(Transport::from_label("quic"), Transport::Tcp);
        assert_eq!(Transport::from_label(""), Transport::Tcp);
        assert_eq!(Transport::from_label("  "), Transport::Tcp);
    }

    #[test]
    fn test_transport_default_is_tcp() {
        assert_eq!(Transport::default(), Transport::Tcp);
    }

    #[test]
    fn test_transport_serializes_lowercase() {
        let json = serde_json::to_string(&Transport::Ws).unwrap();
        assert_eq!(json, r#""ws""#);
    }

    #[test]
    fn test_tls_options_default() {
        let tls = TlsOptions::default();
        assert!(!tls.enabled);
        assert!(tls.server_name.is_none());
        assert!(!tls.insecure_skip_verify);
    }
}
