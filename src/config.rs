//! YAML configuration file support.
//!
//! Loads the featurizer settings and the binary's logging settings from one
//! YAML file. Every section is optional and falls back to defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "support-bot contexts"
//!
//! featurizer:
//!   version: 1
//!   tfidf_cap: 1.0
//!   similarity_fallback: 0.0
//!   excluded_extractors: ["pattern", "system"]
//!   use_parallel: true
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use featurizer::{ContextFeaturizer, FeaturizerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CtxfeatConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub featurizer: FeaturizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CtxfeatConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CtxfeatConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.featurizer
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("featurizer: {err}")))?;
        self.logging.validate()?;

        Ok(())
    }

    /// Build a featurizer from the `featurizer` section.
    pub fn build_featurizer(&self) -> Result<ContextFeaturizer, ConfigLoadError> {
        ContextFeaturizer::new(self.featurizer.clone())
            .map_err(|err| ConfigLoadError::Validation(format!("featurizer: {err}")))
    }
}

impl Default for CtxfeatConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            featurizer: FeaturizerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging settings for the `ctxfeat` binary. `RUST_LOG` wins over `level`
/// when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of trace, debug, info, warn, error, off (got {other})"
            ))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
