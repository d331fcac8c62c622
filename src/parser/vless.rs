//! VLess link decoder
//!
//! This module decodes VLess (vless://) share links.
//! Format: vless://uuid@host:port?params#label

use tracing::trace;
use url::Url;

use crate::parser::error::ParseError;
use crate::parser::normalize::{
    LinkQuery, decode_label, host_from_url, map_url_error, require_credential, require_port,
    resolve_name,
};
use crate::profile::record::{ProxyKind, ProxyRecord, TlsOptions, Transport, TransportOptions};

// ============================================================================
// VLess Decoder
// ============================================================================

/// Decodes a `vless://uuid@host:port?query#label` link into a canonical
/// record.
pub fn parse(uri: &str) -> Result<ProxyRecord, ParseError> {
    trace!("Decoding VLess link");
    let url = Url::parse(uri).map_err(map_url_error)?;

    let credential = require_credential(url.username())?;
    let server = host_from_url(&url)?;
    let port = require_port(url.port())?;
    let query = LinkQuery::from_url(&url);

    let transport = Transport::from_label(query.transport.as_deref().unwrap_or(""));
    let tls_enabled = query.security.as_deref() == Some("tls");
    let server_name = query.sni.or_else(|| query.host.clone());

    let label = url.fragment().map(decode_label);
    let name = resolve_name(label, ProxyKind::Vless, &server, port);

    Ok(ProxyRecord {
        kind: ProxyKind::Vless,
        name,
        server,
        port,
        credential,
        transport,
        tls: TlsOptions {
            enabled: tls_enabled,
            server_name,
            insecure_skip_verify: false,
        },
        transport_opts: TransportOptions {
            path: query.path,
            host: query.host,
        },
        alter_id: 0,
        cipher: "auto".to_string(),
        flow: query.flow,
    })
}
