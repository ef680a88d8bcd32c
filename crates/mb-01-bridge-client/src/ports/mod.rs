//! Ports for the bridge client.
//!
//! The driven side is the event channel itself (`shared_bus::EventChannel`).

pub mod inbound;

pub use inbound::BridgeApi;
pub use shared_bus::EventChannel;
