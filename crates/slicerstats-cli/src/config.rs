//! Configuration file management.
//!
//! Every section and field is optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slicerstats_types::DEFAULT_BROWSER_TYPE;

/// Complete tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source database settings.
    #[serde(default)]
    pub source: SourceConfig,
    /// Country reference settings.
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `uainfo.browser_type` kept by the access scan.
    #[serde(default = "default_browser_type")]
    pub browser_type: String,
}

/// Country reference configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Country reference JSON. Empty = built-in reference.
    #[serde(default)]
    pub countries_file: String,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Indent the JSON document.
    #[serde(default)]
    pub pretty: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    /// `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_browser_type() -> String {
    DEFAULT_BROWSER_TYPE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            browser_type: default_browser_type(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, if given.
    ///
    /// Falls back to defaults if no path is given. A path that does not
    /// exist is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::parse(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configured country reference file, if any.
    pub fn countries_file(&self) -> Option<PathBuf> {
        if self.reference.countries_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.reference.countries_file))
        }
    }
}
