//! Configuration for mqttstore
//!
//! Centralized configuration with sensible defaults. A config value is built
//! once (from defaults, a JSON file, or the builder) and handed to the store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Environment variable holding the path of an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "MQTTSTORE_CONF";

/// Highest accepted log level (Debug)
pub const MAX_LOG_LEVEL: u8 = 5;

/// Main configuration for a store instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// Name of the bucket (table) holding inflight messages
    pub bucket_name: String,

    /// How long Open waits for the exclusive file lock (seconds)
    pub open_timeout_secs: u64,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    pub logger: LoggerConfig,
}

/// Log sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Panic: 0, Fatal: 1, Error: 2, Warn: 3, Info: 4, Debug: 5
    pub level: u8,

    /// Emit JSON lines instead of plain text
    pub json: bool,

    /// Write to `filename` instead of stdout
    pub to_file: bool,

    pub filename: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_name: "MQTT".to_string(),
            open_timeout_secs: 1,
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: 4,
            json: false,
            to_file: false,
            filename: PathBuf::from("mqttstore.log"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from a JSON file
    ///
    /// Missing fields take their default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            StoreError::Config(format!("invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the file named by `MQTTSTORE_CONF`
    ///
    /// Falls back to defaults when the variable is unset or empty.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => {
                tracing::debug!("Loading config from {:?}", path);
                Self::from_file(PathBuf::from(path))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Check config invariants
    pub fn validate(&self) -> Result<()> {
        if self.bucket_name.is_empty() {
            return Err(StoreError::Config("bucket_name must not be empty".into()));
        }
        if self.logger.level > MAX_LOG_LEVEL {
            return Err(StoreError::Config(format!(
                "logger.level must be between 0 and {}, got {}",
                MAX_LOG_LEVEL, self.logger.level
            )));
        }
        Ok(())
    }

    /// Open timeout as a Duration
    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_secs)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the bucket name
    pub fn bucket_name(mut self, name: impl Into<String>) -> Self {
        self.config.bucket_name = name.into();
        self
    }

    /// Set the open timeout (in seconds)
    pub fn open_timeout_secs(mut self, secs: u64) -> Self {
        self.config.open_timeout_secs = secs;
        self
    }

    /// Set the log level (0..=5)
    pub fn log_level(mut self, level: u8) -> Self {
        self.config.logger.level = level;
        self
    }

    /// Switch to JSON log output
    pub fn log_json(mut self, json: bool) -> Self {
        self.config.logger.json = json;
        self
    }

    /// Log to the given file instead of stdout
    pub fn log_file(mut self, filename: impl Into<PathBuf>) -> Self {
        self.config.logger.to_file = true;
        self.config.logger.filename = filename.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
