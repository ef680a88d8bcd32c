//! Event-channel plumbing on both sides of the bridge.
//!
//! - `router`: page side, feeds response envelopes into the pending store
//! - `host`: extension side, answers request envelopes

pub mod host;
pub mod router;

pub use host::{ExtensionHandler, ExtensionHost, HandlerError};
pub use router::ResponseRouter;
