//! VMess link decoder
//!
//! This module decodes VMess (vmess://) share links. The payload after the
//! scheme is Base64-encoded JSON carrying the connection details.

use serde::Deserialize;
use tracing::trace;

use crate::parser::base64::decode_base64_text;
use crate::parser::error::ParseError;
use crate::parser::normalize::{
    non_empty, port_from_text, port_in_range, resolve_name, strip_ipv6_brackets,
};
use crate::profile::record::{ProxyKind, ProxyRecord, TlsOptions, Transport, TransportOptions};

// ============================================================================
// VMess Decoder
// ============================================================================

/// VMess JSON payload
///
/// Every field is optional at the wire level; required fields are checked
/// after deserialization so their absence reports as a missing field rather
/// than a JSON shape error.
#[derive(Deserialize, Debug)]
struct VmessPayload {
    /// Remark/name
    #[serde(default)]
    ps: Option<String>,
    /// Server address
    #[serde(default)]
    add: Option<String>,
    /// Server port (number or string, depending on the exporter)
    #[serde(default)]
    port: Option<LooseValue>,
    /// UUID
    #[serde(default)]
    id: Option<String>,
    /// Alter ID (number or string)
    #[serde(default)]
    aid: Option<LooseValue>,
    /// Security/encryption method
    #[serde(default)]
    scy: Option<String>,
    /// Network type (tcp, ws, grpc, h2)
    #[serde(default)]
    net: Option<String>,
    /// Transport host header
    #[serde(default)]
    host: Option<String>,
    /// Transport path
    #[serde(default)]
    path: Option<String>,
    /// TLS setting ("tls" enables it; anything else does not)
    #[serde(default)]
    tls: Option<LooseValue>,
    /// TLS server name
    #[serde(default)]
    sni: Option<String>,
}

/// JSON scalar that exporters emit inconsistently as a number, a string, or
/// some other type entirely.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum LooseValue {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

/// Decodes a `vmess://<base64 json>` link into a canonical record.
pub fn parse(uri: &str) -> Result<ProxyRecord, ParseError> {
    trace!("Decoding VMess link");

    let encoded = uri
        .split_once("://")
        .map(|(_, rest)| rest)
        .ok_or_else(|| ParseError::MalformedUri("missing '://' separator".to_string()))?;

    let decoded = decode_base64_text(encoded)?;
    trace!("Decoded VMess JSON: {}", decoded);

    let payload: VmessPayload = serde_json::from_str(&decoded)
        .map_err(|error| ParseError::JsonParse(error.to_string()))?;

    // The minimum needed to route traffic; a record without a destination or
    // credential is meaningless, so these never default.
    let server = match non_empty(payload.add) {
        Some(server) => strip_ipv6_brackets(&server).to_string(),
        None => return Err(ParseError::MissingField("add".to_string())),
    };
    let port = match payload.port {
        Some(port) => coerce_port(port)?,
        None => return Err(ParseError::MissingField("port".to_string())),
    };
    let credential = non_empty(payload.id)
        .ok_or_else(|| ParseError::MissingField("id".to_string()))?;

    let transport = Transport::from_label(payload.net.as_deref().unwrap_or(""));
    let tls_enabled = matches!(&payload.tls, Some(LooseValue::Text(text)) if text == "tls");

    let host = non_empty(payload.host);
    let server_name = non_empty(payload.sni).or_else(|| host.clone());
    let name = resolve_name(payload.ps, ProxyKind::Vmess, &server, port);

    Ok(ProxyRecord {
        kind: ProxyKind::Vmess,
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
            path: non_empty(payload.path),
            host,
        },
        alter_id: coerce_alter_id(payload.aid),
        cipher: non_empty(payload.scy).unwrap_or_else(|| "auto".to_string()),
        flow: None,
    })
}

fn coerce_port(value: LooseValue) -> Result<u16, ParseError> {
    match value {
        LooseValue::Number(number) => port_in_range(number),
        LooseValue::Text(text) => port_from_text(&text),
        LooseValue::Other(other) => Err(ParseError::InvalidPort(other.to_string())),
    }
}

/// Alter ID defaults to 0; anything unreadable degrades to the default
/// rather than failing the whole link.
fn coerce_alter_id(value: Option<LooseValue>) -> u32 {
    match value {
        Some(LooseValue::Number(number)) => u32::try_from(number).unwrap_or(0),
        Some(LooseValue::Text(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
