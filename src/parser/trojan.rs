//! Trojan link decoder
//!
//! This module decodes Trojan (trojan://) share links.
//! Format: trojan://password@host:port?params#label

use tracing::trace;
use url::Url;

use crate::parser::error::ParseError;
use crate::parser::normalize::{
    LinkQuery, decode_label, host_from_url, map_url_error, require_credential, require_port,
    resolve_name,
};
use crate::profile::record::{ProxyKind, ProxyRecord, TlsOptions, Transport, TransportOptions};

// ============================================================================
// Trojan Decoder
// ============================================================================

/// Decodes a `trojan://password@host:port?query#label` link into a canonical
/// record.
///
/// The credential is an opaque password, not a UUID. TLS is on unless the
/// link disables it explicitly, since the trojan wire protocol assumes a TLS
/// transport.
pub fn parse(uri: &str) -> Result<ProxyRecord, ParseError> {
    trace!("Decoding Trojan link");
    let url = Url::parse(uri).map_err(map_url_error)?;

    let credential = require_credential(url.username())?;
    let server = host_from_url(&url)?;
    let port = require_port(url.port())?;
    let query = LinkQuery::from_url(&url);

    let transport = Transport::from_label(query.transport.as_deref().unwrap_or(""));
    let tls_enabled = query.security.as_deref() != Some("none");

    let label = url.fragment().map(decode_label);
    let name = resolve_name(label, ProxyKind::Trojan, &server, port);

    Ok(ProxyRecord {
        kind: ProxyKind::Trojan,
        name,
        server,
        port,
        credential,
        transport,
        tls: TlsOptions {
            enabled: tls_enabled,
            server_name: query.sni,
            insecure_skip_verify: query.allow_insecure,
        },
        transport_opts: TransportOptions {
            path: query.path,
            host: query.host,
        },
        alter_id: 0,
        cipher: "auto".to_string(),
        flow: None,
    })
}
