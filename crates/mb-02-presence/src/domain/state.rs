//! Presence state machine
//!
//! Detection runs at most once per reset. It stops at the first sighting of
//! the extension marker, or when the retry budget runs out.
//!
//! State Machine:
//! ```text
//! [UNKNOWN] ──detection started──→ [CHECKING]
//!     ↑                               │
//!     │                               ├── marker found ──────→ [INSTALLED {id}]
//!     │                               │                              │
//!     │                               └── budget exhausted ──→ [ABSENT]
//!     │                                                              │
//!     └──────────────────────────── reset ───────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Whether the browser extension is available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PresenceState {
    /// Detection has not run yet
    #[default]
    Unknown,
    /// Probing for the marker
    Checking,
    /// Marker seen; carries the extension id it advertised
    Installed { extension_id: String },
    /// Budget ran out without a sighting
    Absent,
}

impl PresenceState {
    /// Installed and Absent end detection until reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, PresenceState::Installed { .. } | PresenceState::Absent)
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, PresenceState::Installed { .. })
    }

    pub fn extension_id(&self) -> Option<&str> {
        match self {
            PresenceState::Installed { extension_id } => Some(extension_id),
            _ => None,
        }
    }
}

/// Events that drive presence transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenceEvent {
    DetectionStarted,
    MarkerFound { extension_id: String },
    BudgetExhausted,
    Reset,
}

/// Calculate the next state.
///
/// Pure and deterministic; events that make no sense in the current state
/// leave it unchanged.
pub fn next_state(current: &PresenceState, event: PresenceEvent) -> PresenceState {
    match (current, event) {
        (PresenceState::Unknown, PresenceEvent::DetectionStarted) => PresenceState::Checking,

        (PresenceState::Checking, PresenceEvent::MarkerFound { extension_id }) => {
            PresenceState::Installed { extension_id }
        }
        (PresenceState::Checking, PresenceEvent::BudgetExhausted) => PresenceState::Absent,

        (_, PresenceEvent::Reset) => PresenceState::Unknown,

        // No-op transitions (stay in current state)
        (state, _) => state.clone(),
    }
}
