use crate::ports::{ExtensionMarker, MarkerProbe};
use parking_lot::RwLock;
use std::sync::Arc;

/// Environment variable holding the installed extension's id
pub const EXTENSION_ID_ENV: &str = "MB_EXTENSION_ID";

/// Marker set in-process by whoever hosts the extension.
///
/// Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MarkerSlot {
    marker: Arc<RwLock<Option<ExtensionMarker>>>,
}

impl MarkerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, marker: ExtensionMarker) {
        *self.marker.write() = Some(marker);
    }

    pub fn clear(&self) {
        *self.marker.write() = None;
    }

    pub fn is_set(&self) -> bool {
        self.marker.read().is_some()
    }
}

impl MarkerProbe for MarkerSlot {
    fn probe(&self) -> Option<ExtensionMarker> {
        self.marker.read().clone()
    }
}

/// Reads the marker from the process environment on every probe.
#[derive(Clone, Debug)]
pub struct EnvMarkerProbe {
    var: String,
}

impl EnvMarkerProbe {
    pub fn new() -> Self {
        Self::with_var(EXTENSION_ID_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvMarkerProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerProbe for EnvMarkerProbe {
    fn probe(&self) -> Option<ExtensionMarker> {
        std::env::var(&self.var)
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(ExtensionMarker::new)
    }
}
