//! Base64 decoding utilities
//!
//! This module provides functionality for decoding Base64-encoded share-link
//! payloads, supporting multiple Base64 variants including standard, URL-safe,
//! and content with or without padding. It also recognizes whole input bodies
//! that arrive wrapped in a single Base64 layer.

use tracing::trace;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};

use crate::parser::error::ParseError;

// ============================================================================
// Base64 Decoding
// ============================================================================

/// Decodes Base64 content, trying multiple variants
///
/// Attempts to decode the content using:
/// 1. Standard Base64
/// 2. URL-safe Base64
/// 3. URL-safe Base64 without padding
/// 4. Standard/URL-safe with padding added
///
/// Whitespace in the input is automatically removed before decoding.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, ParseError> {
    // Remove all whitespace (handles line breaks within Base64)
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    trace!(
        "Attempting Base64 decode, cleaned length: {} bytes",
        cleaned.len()
    );

    // Try standard Base64 first
    if let Ok(decoded) = STANDARD.decode(&cleaned) {
        trace!("Decoded using standard Base64");
        return Ok(decoded);
    }

    // Try URL-safe Base64
    if let Ok(decoded) = URL_SAFE.decode(&cleaned) {
        trace!("Decoded using URL-safe Base64");
        return Ok(decoded);
    }

    // Try URL-safe Base64 without padding
    if let Ok(decoded) = URL_SAFE_NO_PAD.decode(&cleaned) {
        trace!("Decoded using URL-safe Base64 without padding");
        return Ok(decoded);
    }

    // Try with padding added if needed
    let padded = add_base64_padding(&cleaned);
    if let Ok(decoded) = STANDARD.decode(&padded) {
        trace!("Decoded using standard Base64 with added padding");
        return Ok(decoded);
    }
    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        trace!("Decoded using URL-safe Base64 with added padding");
        return Ok(decoded);
    }

    Err(ParseError::Base64Decode(
        "no supported variant matched".to_string(),
    ))
}

/// Adds proper padding to Base64 string if missing
///
/// Base64 strings should have a length that is a multiple of 4.
/// This function adds '=' padding characters as needed.
pub fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

/// Decodes Base64 content into a UTF-8 string.
pub fn decode_base64_text(content: &str) -> Result<String, ParseError> {
    let decoded = decode_base64(content)?;
    String::from_utf8(decoded)
        .map_err(|_| ParseError::Base64Decode("decoded bytes are not valid UTF-8".to_string()))
}

/// Unwraps an input body that is itself a single Base64 layer.
///
/// Subscription endpoints commonly serve the whole link list wrapped in one
/// Base64 blob. If the body carries no URI scheme of its own but decodes to
/// text that does, the decoded text is returned; otherwise `None`.
pub fn decode_body_if_base64(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return None;
    }

    if let Ok(decoded) = decode_base64_text(trimmed)
        && decoded.contains("://")
    {
        trace!("Input body decoded from a Base64 wrapper");
        return Some(decoded);
    }

    None
}
