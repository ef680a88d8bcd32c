//! # Runtime Configuration
//!
//! Layered: defaults, then an optional JSON file, then environment overrides.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MB_CONFIG_FILE` | path of the JSON file |
//! | `MB_DEFAULT_TIMEOUT` | `client.timeouts.default` |
//! | `MB_PRESENCE_ATTEMPTS` | `presence.max_attempts` |
//! | `MB_PRESENCE_INTERVAL` | `presence.retry_interval` |
//! | `MB_BUS_CAPACITY` | `bus_capacity` |

use anyhow::{Context, Result};
use mb_01_bridge_client::{ClientConfig, ConfigError};
use mb_02_presence::{PresenceConfig, PresenceConfigError};
use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::duration_serde::parse_duration;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the JSON config file
pub const CONFIG_FILE_ENV: &str = "MB_CONFIG_FILE";

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Bridge client configuration.
    pub client: ClientConfig,
    /// Presence detection configuration.
    pub presence: PresenceConfig,
    /// Events buffered per subscriber before it lags.
    pub bus_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            presence: PresenceConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error(transparent)]
    Client(#[from] ConfigError),

    #[error(transparent)]
    Presence(#[from] PresenceConfigError),

    #[error("bus_capacity must be at least 1")]
    ZeroCapacity,
}

impl RuntimeConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MB_DEFAULT_TIMEOUT") {
            match parse_duration(&value) {
                Ok(timeout) => self.client.timeouts.default = timeout,
                Err(e) => warn!(value = %value, error = e, "Ignoring MB_DEFAULT_TIMEOUT"),
            }
        }

        if let Some(value) = lookup("MB_PRESENCE_ATTEMPTS") {
            match value.trim().parse() {
                Ok(attempts) => self.presence.max_attempts = attempts,
                Err(_) => warn!(value = %value, "Ignoring MB_PRESENCE_ATTEMPTS"),
            }
        }

        if let Some(value) = lookup("MB_PRESENCE_INTERVAL") {
            match parse_duration(&value) {
                Ok(interval) => self.presence.retry_interval = interval,
                Err(e) => warn!(value = %value, error = e, "Ignoring MB_PRESENCE_INTERVAL"),
            }
        }

        if let Some(value) = lookup("MB_BUS_CAPACITY") {
            match value.trim().parse() {
                Ok(capacity) => self.bus_capacity = capacity,
                Err(_) => warn!(value = %value, "Ignoring MB_BUS_CAPACITY"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.client.validate()?;
        self.presence.validate()?;
        if self.bus_capacity == 0 {
            return Err(RuntimeConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
