//! Configuration module for Podium.

use serde::Deserialize;
use std::path::Path;

use crate::{PodiumError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/podium.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/podium.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Forum presentation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Post count from which a thread is shown as hot.
    #[serde(default = "default_hot_minimum")]
    pub hot_minimum: i64,
}

fn default_hot_minimum() -> i64 {
    20
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            hot_minimum: default_hot_minimum(),
        }
    }
}

/// Account token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Lifetime of an activation token in seconds.
    #[serde(default = "default_activation_token_expire")]
    pub activation_token_expire_secs: i64,
    /// Lifetime of a password reset token in seconds.
    #[serde(default = "default_password_reset_token_expire")]
    pub password_reset_token_expire_secs: i64,
}

fn default_activation_token_expire() -> i64 {
    3 * 24 * 60 * 60 // 3 days
}

fn default_password_reset_token_expire() -> i64 {
    24 * 60 * 60 // 1 day
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            activation_token_expire_secs: default_activation_token_expire(),
            password_reset_token_expire_secs: default_password_reset_token_expire(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Forum configuration.
    #[serde(default)]
    pub forum: ForumConfig,
    /// Account configuration.
    #[serde(default)]
    pub account: AccountConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PodiumError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PodiumError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PODIUM_DATABASE_PATH`: Override the database file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PODIUM_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - `hot_minimum` is lower than 1
    /// - a token lifetime is not positive
    pub fn validate(&self) -> Result<()> {
        if self.forum.hot_minimum < 1 {
            return Err(PodiumError::Config(
                "forum.hot_minimum must be at least 1".to_string(),
            ));
        }
        if self.account.activation_token_expire_secs <= 0 {
            return Err(PodiumError::Config(
                "account.activation_token_expire_secs must be positive".to_string(),
            ));
        }
        if self.account.password_reset_token_expire_secs <= 0 {
            return Err(PodiumError::Config(
                "account.password_reset_token_expire_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
