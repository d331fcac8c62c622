use serde::Serialize;

use crate::profile::record::{ProxyKind, ProxyRecord, Transport};
use crate::profile::util::is_false;

pub mod record;
pub mod util;

// ============================================================================
// Clash Document Model
// ============================================================================

/// Clash-style proxy-list document.
///
/// This struct represents the generated output document: a single top-level
/// `proxies` key holding one mapping per converted record. Serialization is
/// deterministic — field order follows struct declaration order and every
/// sub-structure is typed, so the same record list always renders to the
/// same bytes.
#[derive(Serialize, Clone, Debug, Default)]
pub struct ClashProfile {
    pub proxies: Vec<ClashProxy>,
}

impl ClashProfile {
    /// Build a profile from an ordered record list.
    pub fn from_records(records: &[ProxyRecord]) -> Self {
        Self {
            proxies: records.iter().map(ClashProxy::from_record).collect(),
        }
    }

    /// Serialize the profile to a YAML string.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Render an ordered record list into the proxy-list document text.
///
/// An empty record list produces an empty document rather than a document
/// with an empty `proxies` list, matching the converter's contract that
/// output text exists only when something converted.
pub fn render_document(records: &[ProxyRecord]) -> Result<String, serde_yaml::Error> {
    if records.is_empty() {
        return Ok(String::new());
    }
    ClashProfile::from_records(records).to_yaml()
}

// ============================================================================
// Proxy Entries
// ============================================================================

/// One proxy entry in the document.
///
/// A single struct covers all kinds: fields that do not apply to a kind stay
/// `None` and are omitted from the output. Clash spells the TLS server name
/// differently per kind (`servername` for vmess/vless, `sni` for trojan),
/// which is why both keys exist here.
#[derive(Serialize, Clone, Debug)]
pub struct ClashProxy {
    pub name: String,

    #[serde(rename = "type")]
    pub proxy_type: ProxyKind,

    pub server: String,

    pub port: u16,

    /// vmess/vless credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// trojan credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(rename = "alterId", skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub tls: bool,

    #[serde(rename = "skip-cert-verify", skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    pub network: Transport,

    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,

    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,

    #[serde(rename = "h2-opts", skip_serializing_if = "Option::is_none")]
    pub h2_opts: Option<H2Opts>,
}

/// WebSocket transport options.
#[derive(Serialize, Clone, Debug, Default)]
pub struct WsOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<WsHeaders>,
}

/// Headers carried on the WebSocket upgrade; only Host is ever set.
#[derive(Serialize, Clone, Debug)]
pub struct WsHeaders {
    #[serde(rename = "Host")]
    pub host: String,
}

/// gRPC transport options.
#[derive(Serialize, Clone, Debug)]
pub struct GrpcOpts {
    #[serde(rename = "grpc-service-name")]
    pub service_name: String,
}

/// HTTP/2 transport options.
#[derive(Serialize, Clone, Debug, Default)]
pub struct H2Opts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ClashProxy {
    /// Map a canonical record onto its Clash entry.
    pub fn from_record(record: &ProxyRecord) -> Self {
        let is_vmess = record.kind == ProxyKind::Vmess;
        let is_trojan = record.kind == ProxyKind::Trojan;

        let (ws_opts, grpc_opts, h2_opts) = transport_opts(record);

        Self {
            name: record.name.clone(),
            proxy_type: record.kind,
            server: record.server.clone(),
            port: record.port,
            uuid: (!is_trojan).then(|| record.credential.clone()),
            password: is_trojan.then(|| record.credential.clone()),
            alter_id: is_vmess.then_some(record.alter_id),
            cipher: is_vmess.then(|| record.cipher.clone()),
            flow: record.flow.clone(),
            tls: record.tls.enabled,
            skip_cert_verify: record.tls.insecure_skip_verify,
            servername: (!is_trojan)
                .then(|| record.tls.server_name.clone())
                .flatten(),
            sni: is_trojan.then(|| record.tls.server_name.clone()).flatten(),
            network: record.transport,
            ws_opts,
            grpc_opts,
            h2_opts,
        }
    }
}

fn transport_opts(
    record: &ProxyRecord,
) -> (Option<WsOpts>, Option<GrpcOpts>, Option<H2Opts>) {
    let opts = &record.transport_opts;
    match record.transport {
        Transport::Ws => {
            if opts.path.is_none() && opts.host.is_none() {
                return (None, None, None);
            }
            let ws = WsOpts {
                path: opts.path.clone(),
                headers: opts.host.clone().map(|host| WsHeaders { host }),
            };
            (Some(ws), None, None)
        }
        Transport::Grpc => {
            // Clash carries the gRPC service name where other transports
            // carry a path.
            let grpc = opts.path.clone().map(|service_name| GrpcOpts { service_name });
            (None, grpc, None)
        }
        Transport::H2 => {
            if opts.path.is_none() && opts.host.is_none() {
                return (None, None, None);
            }
            let h2 = H2Opts {
                host: opts.host.clone().into_iter().collect(),
                path: opts.path.clone(),
            };
            (None, None, Some(h2))
        }
        Transport::Tcp => (None, None, None),
    }
}
