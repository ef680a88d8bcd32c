//! Presence detector service.

use crate::domain::{next_state, PresenceConfig, PresenceEvent, PresenceState, RetryBudget};
use crate::ports::MarkerProbe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Detects the browser extension by probing for its marker.
///
/// Each probe consumes one unit of the shared [`RetryBudget`]. The first
/// probe runs immediately and later ones wait `retry_interval`. Once the
/// budget is spent without a sighting the detector settles on `Absent` and
/// stays there until [`PresenceDetector::reset`].
pub struct PresenceDetector {
    probe: Arc<dyn MarkerProbe>,
    budget: Arc<RetryBudget>,
    config: PresenceConfig,
    state: watch::Sender<PresenceState>,
    /// Serializes concurrent `detect()` calls
    detecting: Mutex<()>,
    probes: AtomicU64,
}

impl PresenceDetector {
    pub fn new(
        probe: Arc<dyn MarkerProbe>,
        budget: Arc<RetryBudget>,
        config: PresenceConfig,
    ) -> Self {
        let (state, _) = watch::channel(PresenceState::Unknown);
        Self {
            probe,
            budget,
            config,
            state,
            detecting: Mutex::new(()),
            probes: AtomicU64::new(0),
        }
    }

    /// Run detection to a terminal state and return it.
    ///
    /// Returns the current state without probing if detection already
    /// finished.
    pub async fn detect(&self) -> PresenceState {
        let _detecting = self.detecting.lock().await;

        let current = self.state();
        if current.is_terminal() {
            return current;
        }

        self.apply(PresenceEvent::DetectionStarted);

        loop {
            if !self.budget.try_consume() {
                warn!(
                    probes = self.probe_count(),
                    "Probe budget exhausted, extension not detected"
                );
                return self.apply(PresenceEvent::BudgetExhausted);
            }

            let attempt = self.probes.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(marker) = self.probe.probe() {
                info!(
                    extension_id = %marker.id,
                    attempt = attempt,
                    "Extension detected"
                );
                return self.apply(PresenceEvent::MarkerFound {
                    extension_id: marker.id,
                });
            }

            debug!(
                attempt = attempt,
                remaining = self.budget.remaining(),
                "Extension marker not found"
            );

            if self.budget.is_exhausted() {
                warn!(probes = attempt, "Extension not detected");
                return self.apply(PresenceEvent::BudgetExhausted);
            }

            tokio::time::sleep(self.config.retry_interval).await;
        }
    }

    /// Current state
    pub fn state(&self) -> PresenceState {
        self.state.borrow().clone()
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<PresenceState> {
        self.state.subscribe()
    }

    /// Return to `Unknown`. The budget is left as is.
    ///
    /// Waits for an in-flight [`detect`](Self::detect) to settle first, so
    /// detection always ends in a terminal state.
    pub async fn reset(&self) {
        let _detecting = self.detecting.lock().await;
        self.apply(PresenceEvent::Reset);
    }

    /// Probes performed by this detector since creation
    pub fn probe_count(&self) -> u64 {
        self.probes.load(Ordering::Relaxed)
    }

    pub fn budget(&self) -> &Arc<RetryBudget> {
        &self.budget
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    fn apply(&self, event: PresenceEvent) -> PresenceState {
        let mut next = PresenceState::Unknown;
        self.state.send_if_modified(|state| {
            next = next_state(state, event);
            if *state == next {
                false
            } else {
                debug!(from = ?state, to = ?next, "Presence state changed");
                *state = next.clone();
                true
            }
        });
        next
    }
}
