//! # Media Bridge
//!
//! Starts the bridge, checks whether the browser extension is installed and
//! keeps the bridge up until Ctrl+C.
//!
//! The extension advertises itself through `MB_EXTENSION_ID`.

use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_runtime::{BridgeRuntime, RuntimeConfig};
use bridge_telemetry::{init_telemetry, TelemetryConfig};
use mb_02_presence::{EnvMarkerProbe, PresenceState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Media Bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    // Load configuration
    let config = RuntimeConfig::load()?;

    let runtime = BridgeRuntime::with_probe(config, Arc::new(EnvMarkerProbe::new()))?;

    match runtime.detect_extension().await {
        PresenceState::Installed { extension_id } => {
            info!(extension_id = %extension_id, "Bridge ready");
        }
        state => {
            info!(state = ?state, "Bridge running without extension");
        }
    }

    // Keep the bridge running
    info!("Bridge is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown();

    Ok(())
}
