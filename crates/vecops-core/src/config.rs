//! `vecops` Configuration Module
//!
//! Provides configuration file support via `vecops.toml` and environment
//! variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`VECOPS_*`, nested keys split on `__`)
//! 2. Configuration file (`vecops.toml`)
//! 3. Default values
//!
//! ```toml
//! [dispatch]
//! max_tier = "avx2"
//! warmup = true
//!
//! [logging]
//! level = "debug"
//! ```

use crate::tier::SimdTier;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "vecops.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "VECOPS_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Kernel dispatch configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Highest tier the selector may pick. `None` = best detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tier: Option<SimdTier>,
    /// Run every resolved kernel once during `init_dispatch`.
    pub warmup: bool,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main `vecops` configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VecopsConfig {
    /// Kernel dispatch configuration.
    pub dispatch: DispatchConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl VecopsConfig {
    /// Loads configuration from `vecops.toml` in the working directory and the environment.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Figment::new().merge(Toml::file(DEFAULT_CONFIG_FILE)))
    }

    /// Loads configuration from a specific file path plus the environment.
    ///
    /// Unlike [`VecopsConfig::load`], the file must exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Self::figment(Figment::new().merge(Toml::file(path)))
    }

    /// Loads configuration from environment variables only.
    ///
    /// Used by lazy dispatch initialization, which must not touch the filesystem.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::figment(Figment::new())
    }

    /// Creates a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn figment(sources: Figment) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(sources)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
