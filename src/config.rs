//! Checker configuration, loaded from TOML.
//!
//! The config file is optional: the CLI falls back to defaults and layers
//! flag overrides on top, so every field has a default and errors stay
//! close to what went wrong rather than carrying file-discovery context.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Public LanguageTool endpoint, the default checker.
pub const DEFAULT_ENDPOINT: &str = "https://api.languagetool.org/v2/check";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckerConfig {
    /// Check endpoint URL
    pub endpoint: String,
    /// Text language passed to the checker (e.g. "en-US")
    pub language: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Quiet interval before a live re-check, in milliseconds
    pub debounce_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "en-US".to_string(),
            timeout_ms: 10_000,
            debounce_ms: 600,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read checker config from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checker config is not valid TOML: {0}")]
    Toml(#[from] toml_edit::de::Error),

    #[error("invalid checker config: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

impl CheckerConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config TOML. Absent fields take their defaults.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = toml_edit::de::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity-check the merged config, including any CLI overrides.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.trim().is_empty() {
            return Err(ValidationError::EmptyField("endpoint"));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::EmptyField("language"));
        }
        if self.timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
