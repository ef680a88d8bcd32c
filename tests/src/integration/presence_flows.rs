//! # Presence Flow Tests
//!
//! Detection timing on a paused clock, budget sharing between detectors,
//! and the assembled runtime detecting an attached extension.

#[cfg(test)]
mod tests {
    use crate::fixtures::CatalogHandler;
    use bridge_runtime::{BridgeRuntime, RuntimeConfig};
    use mb_01_bridge_client::BridgeApi;
    use mb_02_presence::*;
    use parking_lot::Mutex;
    use shared_types::{AnilistMedia, MediaIdRequest};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Probe over a marker slot that records when it was asked.
    struct TimedProbe {
        slot: MarkerSlot,
        started: Instant,
        probed_at: Mutex<Vec<Duration>>,
    }

    impl TimedProbe {
        fn new(slot: MarkerSlot) -> Arc<Self> {
            Arc::new(Self {
                slot,
                started: Instant::now(),
                probed_at: Mutex::new(Vec::new()),
            })
        }

        fn probes(&self) -> Vec<Duration> {
            self.probed_at.lock().clone()
        }
    }

    impl MarkerProbe for TimedProbe {
        fn probe(&self) -> Option<ExtensionMarker> {
            self.probed_at.lock().push(self.started.elapsed());
            self.slot.probe()
        }
    }

    fn detector(probe: Arc<TimedProbe>, budget: Arc<RetryBudget>) -> PresenceDetector {
        PresenceDetector::new(probe, budget, PresenceConfig::default())
    }

    fn whole_seconds(probes: &[Duration]) -> Vec<u64> {
        probes.iter().map(|d| d.as_secs()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_after_three_probes_one_second_apart() {
        let probe = TimedProbe::new(MarkerSlot::new());
        let detector = detector(probe.clone(), Arc::new(RetryBudget::new(DEFAULT_PROBE_BUDGET)));

        assert_eq!(detector.detect().await, PresenceState::Absent);
        assert_eq!(whole_seconds(&probe.probes()), vec![0, 1, 2]);

        // Terminal: no further probing, however long we wait
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(detector.detect().await, PresenceState::Absent);
        assert_eq!(probe.probes().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_installed_on_first_probe_without_delay() {
        let slot = MarkerSlot::new();
        slot.set(ExtensionMarker::new("ext-42"));
        let probe = TimedProbe::new(slot);
        let detector = detector(probe.clone(), Arc::new(RetryBudget::new(DEFAULT_PROBE_BUDGET)));

        let started = Instant::now();
        let state = detector.detect().await;

        assert_eq!(state.extension_id(), Some("ext-42"));
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(probe.probes().len(), 1);
        assert_eq!(detector.budget().remaining(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_appearing_between_probes() {
        let slot = MarkerSlot::new();
        let probe = TimedProbe::new(slot.clone());
        let detector = detector(probe.clone(), Arc::new(RetryBudget::new(DEFAULT_PROBE_BUDGET)));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            slot.set(ExtensionMarker::new("late-ext"));
        });

        let state = detector.detect().await;

        assert_eq!(state, PresenceState::Installed { extension_id: "late-ext".into() });
        assert_eq!(whole_seconds(&probe.probes()), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_changes_are_observable() {
        let slot = MarkerSlot::new();
        slot.set(ExtensionMarker::new("ext-1"));
        let detector = detector(TimedProbe::new(slot), Arc::new(RetryBudget::new(3)));
        let mut states = detector.subscribe();

        assert_eq!(*states.borrow_and_update(), PresenceState::Unknown);
        detector.detect().await;

        assert!(states.has_changed().unwrap());
        assert!(states.borrow_and_update().is_installed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detectors_share_one_budget() {
        let budget = Arc::new(RetryBudget::new(DEFAULT_PROBE_BUDGET));

        let first_probe = TimedProbe::new(MarkerSlot::new());
        let first = detector(first_probe.clone(), Arc::clone(&budget));
        assert_eq!(first.detect().await, PresenceState::Absent);
        assert_eq!(first_probe.probes().len(), 3);

        // Budget already spent: straight to absent, no probing
        let second_probe = TimedProbe::new(MarkerSlot::new());
        let second = detector(second_probe.clone(), Arc::clone(&budget));
        let started = Instant::now();

        assert_eq!(second.detect().await, PresenceState::Absent);
        assert!(second_probe.probes().is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_keeps_budget_spent() {
        let budget = Arc::new(RetryBudget::new(DEFAULT_PROBE_BUDGET));
        let probe = TimedProbe::new(MarkerSlot::new());
        let detector = detector(probe.clone(), Arc::clone(&budget));

        detector.detect().await;
        detector.reset().await;
        assert_eq!(detector.state(), PresenceState::Unknown);

        assert_eq!(detector.detect().await, PresenceState::Absent);
        assert_eq!(probe.probes().len(), 3);
    }

    // =========================================================================
    // RUNTIME
    // =========================================================================

    #[tokio::test]
    async fn test_runtime_detects_attached_extension_and_calls_it() {
        let runtime = BridgeRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.attach_extension("catalog-ext", Arc::new(CatalogHandler));

        let state = runtime.detect_extension().await;
        assert_eq!(state.extension_id(), Some("catalog-ext"));

        let id = runtime
            .client()
            .get_anime_id(MediaIdRequest {
                source_id: "src1".into(),
                anilist: AnilistMedia::with_id(7),
            })
            .await
            .unwrap();
        assert_eq!(id.data, "anime-7");

        runtime.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_redetect_after_extension_removed() {
        let runtime = BridgeRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.attach_extension("catalog-ext", Arc::new(CatalogHandler));
        assert!(runtime.detect_extension().await.is_installed());

        runtime.shutdown();
        runtime.redetect().await;

        assert_eq!(runtime.detect_extension().await, PresenceState::Absent);
        assert_eq!(runtime.detector().probe_count(), 4);
    }
}
