//! Response router.
//!
//! One background task per client. It owns the response subscription and
//! hands every response envelope to the pending call store, which decides
//! which caller (if any) it belongs to.

use crate::domain::pending::{PendingRequestStore, ReplyOutcome};
use shared_bus::{BridgeEvent, Subscription};
use shared_types::BridgeEnvelope;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes response events to pending calls.
pub struct ResponseRouter {
    /// Response subscription, taken before the first request is emitted
    subscription: Subscription,
    /// Calls waiting for a response
    pending: Arc<PendingRequestStore>,
}

impl ResponseRouter {
    pub fn new(subscription: Subscription, pending: Arc<PendingRequestStore>) -> Self {
        Self {
            subscription,
            pending,
        }
    }

    /// Route responses until the bus is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!("[ResponseRouter] Started listening for bridge responses");

        while let Some(event) = self.subscription.recv().await {
            match event {
                BridgeEvent::Response(envelope) => {
                    self.route(envelope);
                }
                BridgeEvent::Request(envelope) => {
                    debug!(endpoint = %envelope.endpoint, "Ignoring request on response topic");
                }
            }
        }

        warn!("[ResponseRouter] Event bus closed, shutting down");
    }

    /// Deliver one response envelope. Returns true if a caller received it.
    pub fn route(&self, envelope: BridgeEnvelope) -> bool {
        let outcome = if envelope.is_response() {
            ReplyOutcome::Data(envelope.data)
        } else {
            ReplyOutcome::Invalid(envelope.message_type)
        };

        match envelope.correlation_id {
            Some(correlation_id) => {
                debug!(
                    correlation_id = %correlation_id,
                    endpoint = %envelope.endpoint,
                    "Routing response to pending call"
                );
                self.pending
                    .complete(correlation_id, &envelope.endpoint, outcome)
            }
            None => match envelope.endpoint.parse() {
                Ok(endpoint) => {
                    debug!(endpoint = %envelope.endpoint, "Routing uncorrelated response");
                    self.pending.complete_oldest(endpoint, outcome)
                }
                Err(e) => {
                    warn!(error = %e, "Dropping response for unknown endpoint");
                    false
                }
            },
        }
    }
}
