//! Marker probe adapters.

pub mod marker;

pub use marker::{EnvMarkerProbe, MarkerSlot, EXTENSION_ID_ENV};
