//! Pending Call Store - one entry per in-flight bridge call.
//!
//! Maps correlation IDs to the callers waiting on a response event. An entry
//! is the call's "listener": it exists from just before the request is
//! emitted until the call resolves, rejects, times out, or is cancelled.

use dashmap::DashMap;
use shared_types::{CorrelationId, EndpointName, MessageType};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What the extension sent back for a call
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// Well-formed `RESPONSE`; carries `data`
    Data(serde_json::Value),
    /// Matching envelope with the wrong message type
    Invalid(MessageType),
}

/// Reply delivered to a waiting caller
#[derive(Debug)]
pub struct ExtensionReply {
    /// Correlation ID this reply is for
    pub correlation_id: CorrelationId,
    pub outcome: ReplyOutcome,
    /// Time between registration and delivery
    pub response_time: Duration,
}

/// A call waiting for its response
struct PendingCall {
    /// Channel to deliver the reply
    sender: oneshot::Sender<ExtensionReply>,
    /// When the call was registered
    created_at: Instant,
    /// Endpoint the request went to
    endpoint: EndpointName,
    /// Registration order, for legacy FIFO matching
    sequence: u64,
}

/// Statistics for the pending call store
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Total calls registered
    pub total_registered: AtomicU64,
    /// Total calls resolved with data
    pub total_completed: AtomicU64,
    /// Total calls rejected for a protocol violation
    pub total_rejected: AtomicU64,
    /// Total calls that hit their deadline
    pub total_timeouts: AtomicU64,
    /// Total calls cancelled or dropped by the caller
    pub total_cancelled: AtomicU64,
    /// Responses that matched no pending call
    pub total_unmatched: AtomicU64,
}

/// Pending call store.
///
/// Flow:
/// 1. Caller calls `register()` to get a correlation ID and a receiver
/// 2. Caller emits the request envelope carrying that ID
/// 3. The response router calls `complete()` when the response arrives
/// 4. Caller awaits the receiver, or gives up via `expire()` / `cancel()`
pub struct PendingRequestStore {
    /// Map of correlation ID to pending call
    pending: DashMap<CorrelationId, PendingCall>,
    /// Monotonic registration counter
    sequence: AtomicU64,
    /// Statistics
    stats: Arc<PendingStats>,
}

impl PendingRequestStore {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            sequence: AtomicU64::new(0),
            stats: Arc::new(PendingStats::default()),
        }
    }

    /// Register a pending call and get a receiver for the reply.
    pub fn register(
        &self,
        endpoint: EndpointName,
    ) -> (CorrelationId, oneshot::Receiver<ExtensionReply>) {
        let correlation_id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();

        let call = PendingCall {
            sender: tx,
            created_at: Instant::now(),
            endpoint,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };

        self.pending.insert(correlation_id, call);
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(
            correlation_id = %correlation_id,
            endpoint = %endpoint,
            "Registered pending call"
        );

        (correlation_id, rx)
    }

    /// Deliver a reply to the call registered under `correlation_id`.
    ///
    /// The reply is only accepted when `endpoint` matches the endpoint the
    /// call was made to; otherwise the call stays pending. Returns true if a
    /// waiting caller received the reply.
    pub fn complete(
        &self,
        correlation_id: CorrelationId,
        endpoint: &str,
        outcome: ReplyOutcome,
    ) -> bool {
        match self
            .pending
            .remove_if(&correlation_id, |_, call| call.endpoint.as_str() == endpoint)
        {
            Some((_, call)) => self.deliver(correlation_id, call, outcome),
            None => {
                self.stats.total_unmatched.fetch_add(1, Ordering::Relaxed);
                if self.pending.contains_key(&correlation_id) {
                    warn!(
                        correlation_id = %correlation_id,
                        endpoint = endpoint,
                        "Response endpoint does not match pending call, ignoring"
                    );
                } else {
                    warn!(
                        correlation_id = %correlation_id,
                        endpoint = endpoint,
                        "Response for unknown or expired correlation ID"
                    );
                }
                false
            }
        }
    }

    /// Deliver a reply that carries no correlation ID to the oldest call
    /// pending on `endpoint`.
    pub fn complete_oldest(&self, endpoint: EndpointName, outcome: ReplyOutcome) -> bool {
        let oldest = self
            .pending
            .iter()
            .filter(|entry| entry.endpoint == endpoint)
            .min_by_key(|entry| entry.sequence)
            .map(|entry| *entry.key());

        let removed = oldest.and_then(|id| {
            self.pending
                .remove_if(&id, |_, call| call.endpoint == endpoint)
        });

        match removed {
            Some((correlation_id, call)) => self.deliver(correlation_id, call, outcome),
            None => {
                self.stats.total_unmatched.fetch_add(1, Ordering::Relaxed);
                warn!(endpoint = %endpoint, "Uncorrelated response with no pending call");
                false
            }
        }
    }

    fn deliver(&self, correlation_id: CorrelationId, call: PendingCall, outcome: ReplyOutcome) -> bool {
        let response_time = call.created_at.elapsed();
        let counter = match outcome {
            ReplyOutcome::Data(_) => &self.stats.total_completed,
            ReplyOutcome::Invalid(_) => &self.stats.total_rejected,
        };

        let reply = ExtensionReply {
            correlation_id,
            outcome,
            response_time,
        };

        match call.sender.send(reply) {
            Ok(()) => {
                counter.fetch_add(1, Ordering::Relaxed);
                debug!(
                    correlation_id = %correlation_id,
                    endpoint = %call.endpoint,
                    response_time_ms = response_time.as_millis(),
                    "Completed pending call"
                );
                true
            }
            Err(_) => {
                // Receiver was dropped (caller went away)
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    correlation_id = %correlation_id,
                    endpoint = %call.endpoint,
                    "Pending call receiver dropped"
                );
                false
            }
        }
    }

    /// Remove a call that hit its deadline
    pub fn expire(&self, correlation_id: &CorrelationId) -> bool {
        match self.pending.remove(correlation_id) {
            Some((_, call)) => {
                self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
                warn!(
                    correlation_id = %correlation_id,
                    endpoint = %call.endpoint,
                    elapsed_ms = call.created_at.elapsed().as_millis(),
                    "Pending call expired without response"
                );
                true
            }
            None => false,
        }
    }

    /// Cancel a pending call
    pub fn cancel(&self, correlation_id: &CorrelationId) -> bool {
        if self.pending.remove(correlation_id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            debug!(correlation_id = %correlation_id, "Pending call cancelled");
            true
        } else {
            false
        }
    }

    /// Get number of currently pending calls
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of calls pending on one endpoint
    pub fn pending_for(&self, endpoint: EndpointName) -> usize {
        self.pending
            .iter()
            .filter(|entry| entry.endpoint == endpoint)
            .count()
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.pending.contains_key(correlation_id)
    }

    /// Get statistics
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancels the pending call when dropped, unless it already settled.
///
/// Held by the calling future so that abandoning the future cannot leave a
/// listener behind.
pub(crate) struct PendingGuard<'a> {
    store: &'a PendingRequestStore,
    correlation_id: CorrelationId,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(store: &'a PendingRequestStore, correlation_id: CorrelationId) -> Self {
        Self {
            store,
            correlation_id,
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.store.cancel(&self.correlation_id);
    }
}
