//! Share-link parsing module
//!
//! This module provides functionality for:
//! - Routing candidate lines to a decoder by URI scheme
//! - Decoding share links (vmess://, vless://, trojan://) into canonical
//!   proxy records
//! - Classifying every failure as typed data for per-line reporting

pub mod base64;
pub mod error;
pub mod normalize;
pub mod trojan;
pub mod vless;
pub mod vmess;

use tracing::debug;

use crate::parser::error::ParseError;
use crate::profile::record::ProxyRecord;

// ============================================================================
// Scheme Routing
// ============================================================================

/// Supported link schemes.
///
/// The scheme set is closed on purpose: adding a decoder means adding a
/// variant here, and the compiler then points at every match that needs the
/// new arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScheme {
    Vmess,
    Vless,
    Trojan,
}

impl LinkScheme {
    /// Matches a scheme label case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "vmess" => Some(Self::Vmess),
            "vless" => Some(Self::Vless),
            "trojan" => Some(Self::Trojan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vmess => "vmess",
            Self::Vless => "vless",
            Self::Trojan => "trojan",
        }
    }
}

/// Extracts the scheme label before `://`, if any.
fn extract_scheme(uri: &str) -> Option<&str> {
    uri.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty())
}

/// Routes one trimmed line to its decoder.
///
/// Unknown schemes fail without invoking any decoder; the error carries the
/// raw prefix found (or "none" when the line carries no scheme label at all).
pub fn parse_link(line: &str) -> Result<ProxyRecord, ParseError> {
    let Some(label) = extract_scheme(line) else {
        return Err(ParseError::UnsupportedScheme("none".to_string()));
    };
    let Some(scheme) = LinkScheme::from_label(label) else {
        return Err(ParseError::UnsupportedScheme(label.to_string()));
    };

    debug!("Dispatching {} link", scheme.as_str());
    match scheme {
        LinkScheme::Vmess => vmess::parse(line),
        LinkScheme::Vless => vless::parse(line),
        LinkScheme::Trojan => trojan::parse(line),
    }
}
