// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! MB-01 Bridge Client - typed calls from the page to the browser extension.
//!
//! The page and the extension only share an event channel. This crate turns
//! that fire-and-forget channel into request/response calls.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    BRIDGE CLIENT (mb-01)                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  BridgeApi (one method per endpoint)                          │
//! │         │                                                     │
//! │  call::<E>() ── register ──→ Pending Call Store (DashMap)     │
//! │         │                          ▲                          │
//! │         │ emit REQUEST             │ complete(correlationId)  │
//! │         ▼                          │                          │
//! │  ┌───────────────┐        ┌────────┴────────┐                 │
//! │  │ media-bridge: │        │ ResponseRouter  │                 │
//! │  │   request     │        │ (background)    │                 │
//! │  └───────┬───────┘        └────────▲────────┘                 │
//! └──────────┼─────────────────────────┼──────────────────────────┘
//!            ▼                         │ media-bridge:response
//!      ExtensionHost ──── handler ─────┘
//! ```
//!
//! # Guarantees
//!
//! - A response is delivered to at most one caller, the one whose correlation
//!   ID it echoes.
//! - Every call ends: resolved, rejected, timed out, or cancelled.
//! - Abandoning a call future removes its pending entry.
//!
//! # Usage
//!
//! ```ignore
//! use mb_01_bridge_client::{BridgeApi, BridgeClient, ClientConfig};
//!
//! let client = BridgeClient::new(channel, ClientConfig::default())?;
//! let episodes = client.get_episodes(request).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    BridgeError, BridgeResult, ClientConfig, ConfigError, PendingRequestStore, PendingStats,
    ReplyOutcome, RuleSet, TimeoutConfig,
};
pub use ipc::{ExtensionHandler, ExtensionHost, HandlerError, ResponseRouter};
pub use ports::{BridgeApi, EventChannel};
pub use service::{BridgeClient, CallOptions};
pub use tokio_util::sync::CancellationToken;
