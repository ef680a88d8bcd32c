//! # Shared Bus - Event Channel between Page and Extension
//!
//! The page and the browser extension never call each other directly. They
//! publish envelopes on two well-known topics and listen on the opposite one.
//!
//! ```text
//! ┌──────────────┐   media-bridge:request    ┌──────────────┐
//! │     Page     │ ────────────────────────→ │  Extension   │
//! │ (correlator) │                           │  (scrapers)  │
//! │              │ ←──────────────────────── │              │
//! └──────────────┘   media-bridge:response   └──────────────┘
//! ```
//!
//! Publishing never fails: a request with nobody listening is simply lost,
//! exactly like a browser custom event with no handler.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod channel;
pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use channel::EventChannel;
pub use events::{BridgeEvent, EventFilter, EventTopic, REQUEST_EVENT, RESPONSE_EVENT};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
