//! Driven Ports (SPI - Outbound Dependencies)

use serde::{Deserialize, Serialize};

/// The sign an installed extension leaves for the page to find.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMarker {
    /// Extension id advertised by the marker
    pub id: String,
}

impl ExtensionMarker {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Looks for the extension marker once, without waiting.
pub trait MarkerProbe: Send + Sync {
    fn probe(&self) -> Option<ExtensionMarker>;
}
