//! Presence detection configuration.

use crate::domain::budget::DEFAULT_PROBE_BUDGET;
use serde::{Deserialize, Serialize};
use shared_types::duration_serde;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Probes per detection (size of the shared budget)
    pub max_attempts: u32,
    /// Wait between probes
    #[serde(with = "duration_serde")]
    pub retry_interval: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_PROBE_BUDGET,
            retry_interval: Duration::from_secs(1),
        }
    }
}

impl PresenceConfig {
    pub fn validate(&self) -> Result<(), PresenceConfigError> {
        if self.max_attempts == 0 {
            return Err(PresenceConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}
