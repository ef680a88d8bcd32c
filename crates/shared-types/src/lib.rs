//! # Shared Types Crate
//!
//! Wire types shared by the page-side bridge client and the extension side:
//! the `BridgeEnvelope` carried on both event topics, the `CorrelationId`
//! that pairs a response with its request, and the closed endpoint catalog
//! with its payload contracts.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every payload crossing the event boundary is
//!   defined here, once.
//! - **Closed Catalog**: Endpoints are a fixed set of tagged variants; nothing
//!   outside `EndpointName` can be called through the typed client.
//! - **Opaque Extension Data**: `extraData` belongs to the extension and is
//!   passed through untouched as JSON.

pub mod correlation;
pub mod duration_serde;
pub mod endpoints;
pub mod envelope;
pub mod media;

pub use correlation::CorrelationId;
pub use endpoints::*;
pub use envelope::{BridgeEnvelope, MessageType};
pub use media::*;
