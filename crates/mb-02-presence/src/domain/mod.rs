//! Presence domain: state machine, probe budget and configuration.

pub mod budget;
pub mod config;
pub mod state;

pub use budget::{RetryBudget, DEFAULT_PROBE_BUDGET};
pub use config::{PresenceConfig, PresenceConfigError};
pub use state::{next_state, PresenceEvent, PresenceState};
