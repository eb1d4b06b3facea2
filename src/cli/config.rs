//! Configuration file
//!
//! ```json
//! {"data_dir": "./data", "log_level": "info", "sync_writes": true}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Minimum log severity: trace, info, warn, error, fatal (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// fsync every value before it becomes visible (default true)
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sync_writes() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::Config("data_dir must not be empty".to_string()));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::Config(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Configured minimum log severity
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}
