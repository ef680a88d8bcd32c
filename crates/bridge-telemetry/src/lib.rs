//! # Bridge Telemetry
//!
//! Structured logging for the media bridge, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Bridge calls now log with correlation_id / endpoint fields
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `media-bridge` | Service name in log records |
//! | `MB_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `MB_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `MB_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global log subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
/// Fails with [`TelemetryError::AlreadyInitialized`] if called twice.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Span carrying the standard bridge call fields.
///
/// ```rust,ignore
/// let _span = bridge_span!("detect_extension", attempt = 1).entered();
/// ```
#[macro_export]
macro_rules! bridge_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::tracing::info_span!($name, service = $crate::DEFAULT_SERVICE_NAME $(, $($field)*)?)
    };
}
