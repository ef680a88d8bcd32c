//! Domain layer for the bridge client.
//!
//! Configuration, errors, the pending call store and header rules. The
//! async plumbing that feeds the store lives in `ipc`.

pub mod config;
pub mod error;
pub mod pending;
pub mod rules;

// Re-exports for convenience
pub use config::{ClientConfig, ConfigError, TimeoutConfig};
pub use error::{BridgeError, BridgeResult};
pub use pending::{ExtensionReply, PendingRequestStore, PendingStats, ReplyOutcome};
pub use rules::RuleSet;
