//! Conversion pipeline
//!
//! This module runs the decode pipeline over raw multi-line input: split
//! into candidate lines, decode each line independently, and serialize the
//! successful records into a proxy-list document. It is a pure function of
//! its input; where the text came from and where the document goes are the
//! caller's business.

use anyhow::{Context, Result};
use tracing::debug;

use crate::parser::error::ParseError;
use crate::parser::parse_link;
use crate::profile::record::ProxyRecord;
use crate::profile::render_document;

// ============================================================================
// Conversion Results
// ============================================================================

/// Outcome for one non-blank input line.
///
/// Results map 1:1 onto input lines in original order; a failed line never
/// disturbs its neighbors.
#[derive(Debug, Clone)]
pub struct LineResult {
    /// The trimmed source line this outcome belongs to.
    pub source: String,
    pub outcome: Result<ProxyRecord, ParseError>,
}

impl LineResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn record(&self) -> Option<&ProxyRecord> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.outcome.as_ref().err()
    }
}

/// Aggregate condition of one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    /// No non-blank lines in the input.
    EmptyInput,
    /// Lines were present but none decoded.
    TotalFailure,
    /// Some lines decoded, some did not.
    PartialSuccess,
    /// Every line decoded.
    FullSuccess,
}

/// Result of one `process_input` run: the rendered document plus one
/// outcome per input line.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub document: String,
    pub results: Vec<LineResult>,
}

impl Conversion {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub fn status(&self) -> ConversionStatus {
        if self.results.is_empty() {
            ConversionStatus::EmptyInput
        } else if self.success_count() == 0 {
            ConversionStatus::TotalFailure
        } else if self.failure_count() == 0 {
            ConversionStatus::FullSuccess
        } else {
            ConversionStatus::PartialSuccess
        }
    }

    /// Successfully decoded records in input order.
    pub fn records(&self) -> impl Iterator<Item = &ProxyRecord> {
        self.results.iter().filter_map(LineResult::record)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Splits raw text into trimmed, non-empty candidate lines.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Converts raw multi-line input into a proxy-list document.
///
/// Every non-blank line produces exactly one result, success or failure, in
/// input order. Decode failures stay per-line; the only error this function
/// itself returns is a document serialization failure, which valid records
/// should never trigger.
pub fn process_input(text: &str) -> Result<Conversion> {
    let lines = split_lines(text);
    if lines.is_empty() {
        debug!("Input contains no candidate lines");
        return Ok(Conversion::default());
    }

    debug!("Processing {} candidate lines", lines.len());
    let results: Vec<LineResult> = lines
        .into_iter()
        .map(|line| {
            let outcome = parse_link(&line);
            if let Err(error) = &outcome {
                debug!("Line failed to decode ({}): {}", error.kind(), error);
            }
            LineResult {
                source: line,
                outcome,
            }
        })
        .collect();

    let records: Vec<ProxyRecord> = results.iter().filter_map(|r| r.record().cloned()).collect();
    debug!(
        "Conversion complete: {} of {} lines decoded",
        records.len(),
        results.len()
    );

    let document =
        render_document(&records).context("Failed to serialize the proxy-list document")?;

    Ok(Conversion { document, results })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VLESS_LINE: &str = "vless://13806adb-2368-4acf-b805-45b9ec2525d3@192.168.1.2:443?type=ws&security=tls&path=%2Fray&host=sub.example.com&sni=sub.example.com#example-vless";
    const TROJAN_LINE: &str =
        "trojan://password@192.168.1.3:443?sni=another.example.com#example-trojan";

    #[test]
    fn test_empty_input() {
        let conversion = process_input("").unwrap();
        assert!(conversion.results.is_empty());
        assert_eq!(conversion.document, "");
        assert_eq!(conversion.status(), ConversionStatus::EmptyInput);
    }

    #[test]
    fn test_blank_lines_only() {
        let conversion = process_input("\n   \n\t\n  \n").unwrap();
        assert!(conversion.results.is_empty());
        assert_eq!(conversion.document, "");
        assert_eq!(conversion.status(), ConversionStatus::EmptyInput);
    }

    #[test]
    fn test_one_result_per_non_blank_line() {
        let input = format!("{VLESS_LINE}\n\n   \n{TROJAN_LINE}\nfoo://bar\n");
        let conversion = process_input(&input).unwrap();
        assert_eq!(conversion.results.len(), 3);
    }

    #[test]
    fn test_results_preserve_input_order() {
        let input = format!("foo://bar\n{VLESS_LINE}\n{TROJAN_LINE}");
        let conversion = process_input(&input).unwrap();
        assert_eq!(conversion.results[0].source, "foo://bar");
        assert!(!conversion.results[0].is_success());
        assert_eq!(conversion.results[1].source, VLESS_LINE);
        assert!(conversion.results[1].is_success());
        assert_eq!(conversion.results[2].source, TROJAN_LINE);
        assert!(conversion.results[2].is_success());
    }

    #[test]
    fn test_unsupported_scheme_line() {
        let conversion = process_input("foo://bar").unwrap();
        assert_eq!(conversion.results.len(), 1);
        let error = conversion.results[0].error().unwrap();
        assert_eq!(error.kind(), "unsupported-scheme");
        assert_eq!(conversion.status(), ConversionStatus::TotalFailure);
        assert_eq!(conversion.document, "");
    }

    #[test]
    fn test_vmess_without_destination_fails() {
        // base64 of {"ps":"invalid-config"}
        let conversion = process_input("vmess://ewogICJwcyI6ICJpbnZhbGlkLWNvbmZpZyIKfQ==").unwrap();
        assert_eq!(conversion.results.len(), 1);
        let error = conversion.results[0].error().unwrap();
        assert_eq!(error.kind(), "missing-field");
    }

    #[test]
    fn test_mixed_validity_input() {
        let input = format!("{VLESS_LINE}\nfoo://bar");
        let conversion = process_input(&input).unwrap();

        assert_eq!(conversion.results.len(), 2);
        assert_eq!(conversion.success_count(), 1);
        assert_eq!(conversion.failure_count(), 1);
        assert_eq!(conversion.status(), ConversionStatus::PartialSuccess);

        // Exactly one serialized entry.
        assert_eq!(conversion.document.matches("- name:").count(), 1);
        assert!(conversion.document.contains("example-vless"));
    }

    #[test]
    fn test_full_success_input() {
        let input = format!("{VLESS_LINE}\n{TROJAN_LINE}");
        let conversion = process_input(&input).unwrap();

        assert_eq!(conversion.status(), ConversionStatus::FullSuccess);
        assert_eq!(conversion.records().count(), 2);
        assert!(conversion.document.starts_with("proxies:"));
        let vless_at = conversion.document.find("example-vless").unwrap();
        let trojan_at = conversion.document.find("example-trojan").unwrap();
        assert!(vless_at < trojan_at);
    }

    #[test]
    fn test_successful_records_satisfy_invariants() {
        let input = format!("{VLESS_LINE}\n{TROJAN_LINE}");
        let conversion = process_input(&input).unwrap();
        for record in conversion.records() {
            assert!(record.port >= 1);
            assert!(!record.credential.is_empty());
            assert!(!record.server.is_empty());
            assert!(!record.name.is_empty());
        }
    }

    #[test]
    fn test_line_result_round_trips_vless_fields() {
        let conversion = process_input(VLESS_LINE).unwrap();
        let record = conversion.results[0].record().unwrap();
        assert_eq!(record.server, "192.168.1.2");
        assert_eq!(record.port, 443);
        assert!(record.tls.enabled);
        assert_eq!(record.tls.server_name.as_deref(), Some("sub.example.com"));
        assert_eq!(record.name, "example-vless");
    }

    #[test]
    fn test_whitespace_around_lines_is_trimmed() {
        let input = format!("   {TROJAN_LINE}   ");
        let conversion = process_input(&input).unwrap();
        assert_eq!(conversion.results[0].source, TROJAN_LINE);
        assert!(conversion.results[0].is_success());
    }
}
