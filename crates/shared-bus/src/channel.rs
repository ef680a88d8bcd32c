//! # Event Channel
//!
//! The request/response view of the bus used by both sides of the bridge.
//! Stateless apart from subscription bookkeeping: it publishes envelopes on
//! the right topic and hands out listeners, nothing more. Matching a
//! response to its request is the correlator's job.

use crate::events::{BridgeEvent, EventFilter, EventTopic};
use crate::publisher::{EventPublisher, InMemoryEventBus};
use crate::subscriber::Subscription;
use async_trait::async_trait;
use shared_types::BridgeEnvelope;

/// Bidirectional transport between page and extension.
#[async_trait]
pub trait EventChannel: EventPublisher {
    /// Register a listener for events matching `filter`.
    fn subscribe(&self, filter: EventFilter) -> Subscription;

    /// Live listeners on `topic`.
    fn listener_count(&self, topic: EventTopic) -> usize;

    /// Publish a request envelope. Returns the number of receivers.
    async fn emit_request(&self, envelope: BridgeEnvelope) -> usize {
        self.publish(BridgeEvent::Request(envelope)).await
    }

    /// Publish a response envelope. Returns the number of receivers.
    async fn emit_response(&self, envelope: BridgeEnvelope) -> usize {
        self.publish(BridgeEvent::Response(envelope)).await
    }

    /// Listener for every request, regardless of endpoint.
    fn on_request(&self) -> Subscription {
        self.subscribe(EventFilter::requests())
    }

    /// Listener for every response, regardless of endpoint.
    fn on_response(&self) -> Subscription {
        self.subscribe(EventFilter::responses())
    }
}

impl EventChannel for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }

    fn listener_count(&self, topic: EventTopic) -> usize {
        InMemoryEventBus::listener_count(self, topic)
    }
}
