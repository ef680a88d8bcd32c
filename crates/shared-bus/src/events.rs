//! # Bridge Events
//!
//! The two events that flow between the page and the extension. Each wraps
//! a `BridgeEnvelope`; the topic says which direction it travels.

use serde::{Deserialize, Serialize};
use shared_types::BridgeEnvelope;

/// Event name the page publishes requests under.
pub const REQUEST_EVENT: &str = "media-bridge:request";

/// Event name the extension publishes responses under.
pub const RESPONSE_EVENT: &str = "media-bridge:response";

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BridgeEvent {
    /// Page → extension.
    Request(BridgeEnvelope),
    /// Extension → page.
    Response(BridgeEnvelope),
}

impl BridgeEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Request(_) => EventTopic::Request,
            Self::Response(_) => EventTopic::Response,
        }
    }

    #[must_use]
    pub fn envelope(&self) -> &BridgeEnvelope {
        match self {
            Self::Request(envelope) | Self::Response(envelope) => envelope,
        }
    }

    #[must_use]
    pub fn into_envelope(self) -> BridgeEnvelope {
        match self {
            Self::Request(envelope) | Self::Response(envelope) => envelope,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Request,
    Response,
}

impl EventTopic {
    pub const ALL: [EventTopic; 2] = [EventTopic::Request, EventTopic::Response];

    /// Host event name for this topic.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Request => REQUEST_EVENT,
            Self::Response => RESPONSE_EVENT,
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    #[must_use]
    pub fn requests() -> Self {
        Self::topics(vec![EventTopic::Request])
    }

    #[must_use]
    pub fn responses() -> Self {
        Self::topics(vec![EventTopic::Response])
    }

    /// Check if a topic passes this filter.
    #[must_use]
    pub fn includes(&self, topic: EventTopic) -> bool {
        self.topics.is_empty() || self.topics.contains(&topic)
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &BridgeEvent) -> bool {
        self.includes(event.topic())
    }
}
