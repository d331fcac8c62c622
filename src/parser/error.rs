use thiserror::Error;

// ============================================================================
// Parse Errors
// ============================================================================

/// Error raised while converting a single share link.
///
/// Each variant names the stage that rejected the link, so callers can report
/// per-line failures without string matching. Conversion is per-line: one
/// failing link never aborts the surrounding batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed uri: {0}")]
    MalformedUri(String),

    #[error("invalid base64 payload: {0}")]
    Base64Decode(String),

    #[error("invalid json payload: {0}")]
    JsonParse(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("empty credential")]
    EmptyCredential,

    #[error("invalid port: {0}")]
    InvalidPort(String),
}

impl ParseError {
    /// Stable label for the failure category, used in per-line reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedScheme(_) => "unsupported-scheme",
            Self::MalformedUri(_) => "malformed-uri",
            Self::Base64Decode(_) => "base64-decode",
            Self::JsonParse(_) => "json-parse",
            Self::MissingField(_) => "missing-field",
            Self::EmptyCredential => "empty-credential",
            Self::InvalidPort(_) => "invalid-port",
        }
    }
}
