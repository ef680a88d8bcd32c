//! # MB-02 Presence - Extension Availability Detection
//!
//! Decides whether the browser extension is installed before the page makes
//! bridge calls. Detection is bounded: a shared [`RetryBudget`] caps the
//! total number of probes, spaced by a fixed interval.
//!
//! ```text
//! t=0s   probe ─ miss
//! t=1s   probe ─ miss
//! t=2s   probe ─ miss ──→ Absent (until reset)
//! ```
//!
//! A marker seen on any probe ends detection with `Installed { extension_id }`.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{EnvMarkerProbe, MarkerSlot, EXTENSION_ID_ENV};
pub use domain::{
    PresenceConfig, PresenceConfigError, PresenceEvent, PresenceState, RetryBudget,
    DEFAULT_PROBE_BUDGET,
};
pub use ports::{ExtensionMarker, MarkerProbe};
pub use service::PresenceDetector;
