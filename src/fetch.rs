//! Input acquisition
//!
//! This module collects raw link text for the conversion pipeline: local
//! files, subscription URLs, or stdin. It also applies the whole-body Base64
//! fallback, so the pipeline itself only ever sees plain link lists.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::get_version;
use crate::parser::base64::decode_body_if_base64;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Path Utilities
// ============================================================================

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &str) -> String {
    if (path.starts_with("~/") || path == "~")
        && let Some(home) = dirs_home()
    {
        return path.replacen("~", &home, 1);
    }
    path.to_string()
}

/// Get home directory path
pub fn dirs_home() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok()
    }
}

// ============================================================================
// Input Sources
// ============================================================================

/// Reads link text from a local file.
pub async fn read_file(path: &Path) -> Result<String> {
    debug!("Reading input file: {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file {:?}", path))
}

/// Reads link text from stdin until EOF.
pub async fn read_stdin() -> Result<String> {
    debug!("Reading input from stdin");
    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Fetches link text from a subscription URL.
pub async fn fetch_url(url: &str) -> Result<String> {
    debug!("Fetching subscription URL: {}", url);

    let client = reqwest::Client::builder()
        .user_agent(format!("subforge/{}", get_version()))
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Subscription request failed with status {}: {}", status, url);
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from: {}", url))
}

// ============================================================================
// Body Normalization
// ============================================================================

/// Applies the whole-body Base64 fallback to freshly acquired text.
///
/// Subscription endpoints often serve the link list wrapped in one Base64
/// layer; this unwraps it before the text reaches the pipeline. Plain bodies
/// pass through untouched.
pub fn unwrap_body(text: String) -> String {
    match decode_body_if_base64(&text) {
        Some(decoded) => {
            info!(
                "Input body was Base64-wrapped, decoded {} bytes of link text",
                decoded.len()
            );
            decoded
        }
        None => text,
    }
}
