//! Telemetry reporting for produced documents.
//!
//! This module posts the rendered proxy-list document to an optional remote
//! logging endpoint. Reporting is strictly best-effort: delivery failures
//! are logged and never influence the conversion outcome or the exit code.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::get_version;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Telemetry configuration for reporting produced documents
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TelemetryConfig {
    /// Enable telemetry reporting
    #[serde(default)]
    pub enabled: bool,

    /// Endpoint URL receiving the document (e.g., "https://logs.example.com/report")
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl TelemetryConfig {
    /// Check if telemetry is enabled and properly configured
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.endpoint.is_empty()
    }

    /// Validate the telemetry configuration
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.endpoint.is_empty() {
            anyhow::bail!("Telemetry endpoint is required when telemetry is enabled");
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!("Telemetry endpoint must start with http:// or https://");
        }

        Ok(())
    }
}

/// Client posting documents to the telemetry endpoint
pub struct TelemetryClient {
    client: Client,
    config: TelemetryConfig,
}

impl TelemetryClient {
    /// Create a new telemetry client with the given configuration
    pub fn new(config: TelemetryConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(format!("subforge/{}", get_version()))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for telemetry")?;

        Ok(Self { client, config })
    }

    /// Post a document to the endpoint
    pub async fn report(&self, document: &str) -> Result<()> {
        debug!("Posting document to telemetry endpoint: {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&json!({ "content": document }))
            .send()
            .await
            .with_context(|| {
                format!("Failed to reach telemetry endpoint: {}", self.config.endpoint)
            })?;

        let status = response.status();
        debug!("Telemetry response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Telemetry endpoint returned status {}", status);
        }

        Ok(())
    }
}

/// Report a produced document if telemetry is configured
///
/// This is the fire-and-forget entry point used by the binary: every failure
/// is logged and swallowed here, so callers can spawn it and move on.
pub async fn report_document(config: TelemetryConfig, document: String) {
    if !config.is_configured() {
        debug!("Telemetry is not configured, skipping report");
        return;
    }

    let client = match TelemetryClient::new(config) {
        Ok(client) => client,
        Err(error) => {
            warn!("Telemetry client setup failed: {:#}", error);
            return;
        }
    };

    match client.report(&document).await {
        Ok(()) => debug!("Telemetry report delivered"),
        Err(error) => warn!("Telemetry report failed: {:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert!(config.endpoint.is_empty());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_telemetry_config_is_configured() {
        let mut config = TelemetryConfig::default();
        assert!(!config.is_configured());

        config.enabled = true;
        assert!(!config.is_configured());

        config.endpoint = "https://logs.example.com/report".to_string();
        assert!(config.is_configured());
    }

    #[test]
    fn test_telemetry_config_validate_disabled() {
        let config = TelemetryConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_config_validate_missing_endpoint() {
        let config = TelemetryConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telemetry_config_validate_invalid_endpoint() {
        let config = TelemetryConfig {
            enabled: true,
            endpoint: "ftp://logs.example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telemetry_config_validate_success() {
        let config = TelemetryConfig {
            enabled: true,
            endpoint: "https://logs.example.com/report".to_string(),
            timeout_secs: 5,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_client_rejects_invalid_config() {
        let config = TelemetryConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(TelemetryClient::new(config).is_err());
    }

    #[test]
    fn test_telemetry_config_serde() {
        let toml_str = r#"
            enabled = true
            endpoint = "https://logs.example.com/report"
            timeout_secs = 5
        "#;

        let config: TelemetryConfig = toml::from_str(toml_str).unwrap();
        assert!(config.enabled);
        assert_eq!(config.endpoint, "https://logs.example.com/report");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_telemetry_config_serde_defaults() {
        let config: TelemetryConfig = toml::from_str("enabled = true").unwrap();
        assert!(config.enabled);
        assert!(config.endpoint.is_empty());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn test_report_document_skips_when_unconfigured() {
        // Must return quickly without any network activity.
        report_document(TelemetryConfig::default(), "proxies: []\n".to_string()).await;
    }
}
