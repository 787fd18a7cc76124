//! Settings loading and validation for the engine library.
//!
//! Values come from `GCM_`-prefixed environment variables, read when a host
//! process asks the library to set up logging.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON, one object per line.
    #[default]
    Json,
    /// Human-readable single-line text.
    Plain,
}

/// Validated engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Tracing filter directive (e.g. `"info"`, `"gcm_engine=trace"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".into()
}

impl Settings {
    /// Load and validate settings from `GCM_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("GCM"))
            .build()
            .context("failed to build gcm-engine configuration from environment")?;

        Self::from_config(cfg)
    }

    fn from_config(cfg: config::Config) -> Result<Self> {
        let s: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise gcm-engine configuration")?;

        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("GCM_LOG_LEVEL must not be empty");
        }
        EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("GCM_LOG_LEVEL is not a valid filter: {}", self.log_level))?;
        Ok(())
    }
}
