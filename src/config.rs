//! Application configuration.
//!
//! The config file is optional: every field has a default, and the binary
//! falls back to `AppConfig::default()` when no file is given.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fetch::expand_tilde;
use crate::telemetry::TelemetryConfig;

/// Application configuration parsed from TOML file
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AppConfig {
    /// Output file path; the document goes to stdout when unset
    #[serde(default)]
    pub output: Option<String>,

    /// Telemetry reporting settings (`[telemetry]` table)
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Parse application config from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).context("Failed to parse application config TOML")?;

        config.telemetry.validate()?;

        Ok(config)
    }

    /// Load application config from file path
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read application config from {:?}", path))?;
        Self::from_toml(&content)
    }

    /// Load application config from a file path, expanding a leading tilde
    pub async fn load(path: &str) -> Result<Self> {
        let expanded = expand_tilde(path);
        Self::from_file(Path::new(&expanded)).await
    }
}
