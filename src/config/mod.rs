//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file and validated eagerly: a bad
//! value fails at load time, before the pipeline accepts any transaction.
//!
//! # Example
//!
//! ```no_run
//! use pulsewatch::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod detection;
mod logging;
mod notification;

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

pub use detection::{OutlierConfig, RulesConfig, ScoringConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use notification::NotificationConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub outlier: OutlierConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, fails to parse,
    /// or contains an invalid value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Install the global tracing subscriber per the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate all sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        self.outlier.validate()?;
        self.scoring.validate()?;
        self.notification.validate()?;
        Ok(())
    }
}
