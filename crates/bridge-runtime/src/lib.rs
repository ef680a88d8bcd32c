//! # Media Bridge Runtime
//!
//! Wires the bridge together:
//!
//! ```text
//!                   ┌──────────────────────┐
//!  BridgeClient ──→ │   InMemoryEventBus   │ ←── ExtensionHost (optional,
//!  (mb-01)     ←──  │ request / response   │ ──→  in-process extension)
//!                   └──────────────────────┘
//!  PresenceDetector (mb-02) ── probes ──→ MarkerProbe (slot or environment)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, file, environment)
//! 2. Create the event bus and the bridge client (starts the response router)
//! 3. Create the shared retry budget and the presence detector
//! 4. Run presence detection

pub mod config;

pub use config::{RuntimeConfig, RuntimeConfigError, CONFIG_FILE_ENV};

use anyhow::{Context, Result};
use bridge_telemetry::bridge_span;
use mb_01_bridge_client::{BridgeClient, ExtensionHandler, ExtensionHost};
use mb_02_presence::{
    ExtensionMarker, MarkerProbe, MarkerSlot, PresenceDetector, PresenceState, RetryBudget,
};
use parking_lot::Mutex;
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// The media bridge runtime.
pub struct BridgeRuntime {
    config: RuntimeConfig,
    bus: Arc<InMemoryEventBus>,
    client: Arc<BridgeClient>,
    budget: Arc<RetryBudget>,
    /// Slot the detector reads; `None` when detection uses an external probe
    marker: Option<MarkerSlot>,
    detector: PresenceDetector,
    /// In-process extension hosts
    hosts: Mutex<Vec<ExtensionHost>>,
}

impl BridgeRuntime {
    /// Create a runtime whose presence detector watches the in-process
    /// marker slot (set by [`BridgeRuntime::attach_extension`]).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let marker = MarkerSlot::new();
        Self::build(config, Some(marker.clone()), Arc::new(marker))
    }

    /// Create a runtime that detects the extension through `probe`.
    ///
    /// Extensions attached to such a runtime answer calls but are invisible
    /// to detection; only `probe` decides presence.
    pub fn with_probe(config: RuntimeConfig, probe: Arc<dyn MarkerProbe>) -> Result<Self> {
        Self::build(config, None, probe)
    }

    fn build(
        config: RuntimeConfig,
        marker: Option<MarkerSlot>,
        probe: Arc<dyn MarkerProbe>,
    ) -> Result<Self> {
        config.validate().context("Invalid runtime configuration")?;

        info!(bus_capacity = config.bus_capacity, "Creating media bridge runtime");

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let client = BridgeClient::new(bus.clone(), config.client.clone())
            .context("Failed to create bridge client")?;

        let budget = Arc::new(RetryBudget::new(config.presence.max_attempts));
        let detector = PresenceDetector::new(probe, Arc::clone(&budget), config.presence.clone());

        Ok(Self {
            config,
            bus,
            client: Arc::new(client),
            budget,
            marker,
            detector,
            hosts: Mutex::new(Vec::new()),
        })
    }

    /// Install an in-process extension answering on the bus and advertise
    /// its marker when this runtime owns the marker slot.
    pub fn attach_extension<H: ExtensionHandler>(&self, extension_id: impl Into<String>, handler: Arc<H>) {
        let extension_id = extension_id.into();
        let host = ExtensionHost::spawn(self.bus.clone(), handler);
        self.hosts.lock().push(host);

        match &self.marker {
            Some(marker) => marker.set(ExtensionMarker::new(extension_id.clone())),
            None => debug!(
                extension_id = %extension_id,
                "Presence comes from an external probe, marker not set"
            ),
        }

        info!(extension_id = %extension_id, "Extension attached");
    }

    /// Run presence detection to a terminal state.
    pub async fn detect_extension(&self) -> PresenceState {
        let span = bridge_span!("detect_extension", max_attempts = self.config.presence.max_attempts);

        let state = self.detector.detect().instrument(span).await;
        match &state {
            PresenceState::Installed { extension_id } => {
                info!(extension_id = %extension_id, "Extension available");
            }
            PresenceState::Absent => {
                warn!(
                    budget_remaining = self.budget.remaining(),
                    "Extension not installed, bridge calls will time out"
                );
            }
            other => warn!(state = ?other, "Detection ended in a non-terminal state"),
        }
        state
    }

    /// Reset presence detection and refill the probe budget.
    pub async fn redetect(&self) {
        self.detector.reset().await;
        self.budget.reset(self.config.presence.max_attempts);
    }

    pub fn client(&self) -> Arc<BridgeClient> {
        Arc::clone(&self.client)
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    pub fn detector(&self) -> &PresenceDetector {
        &self.detector
    }

    pub fn budget(&self) -> Arc<RetryBudget> {
        Arc::clone(&self.budget)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Stop the response router and every attached extension host.
    pub fn shutdown(&self) {
        info!("Initiating shutdown...");

        self.client.shutdown();
        for host in self.hosts.lock().drain(..) {
            host.shutdown();
        }
        if let Some(marker) = &self.marker {
            marker.clear();
        }

        info!("Shutdown complete");
    }
}
