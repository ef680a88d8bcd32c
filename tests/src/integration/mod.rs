//! Cross-crate flows: bridge client, extension host, presence detector and
//! runtime talking over one in-memory event bus.

pub mod extension_flows;
pub mod presence_flows;
