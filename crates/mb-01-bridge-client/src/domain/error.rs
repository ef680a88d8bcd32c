//! Bridge call errors.
//!
//! Every error is local to the call that produced it. An empty list from the
//! extension is a valid answer ("nothing found"), never an error.

use shared_types::{EndpointName, MessageType};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by bridge calls
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The matching response was not a `RESPONSE` envelope
    #[error("invalid response from {endpoint}: unexpected message type {message_type}")]
    InvalidResponse {
        endpoint: EndpointName,
        message_type: MessageType,
    },

    /// Nothing arrived before the deadline (extension absent, crashed, or
    /// endpoint unsupported)
    #[error("no response from {endpoint} within {}ms", .timeout.as_millis())]
    NoResponse {
        endpoint: EndpointName,
        timeout: Duration,
    },

    /// The caller cancelled the call
    #[error("call to {endpoint} cancelled")]
    Cancelled { endpoint: EndpointName },

    /// The request payload could not be serialized
    #[error("failed to encode {endpoint} request: {source}")]
    Encode {
        endpoint: EndpointName,
        #[source]
        source: serde_json::Error,
    },

    /// The response data did not match the endpoint contract
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: EndpointName,
        #[source]
        source: serde_json::Error,
    },

    /// The response router stopped (event bus dropped)
    #[error("bridge channel closed")]
    ChannelClosed,
}

impl BridgeError {
    /// Endpoint the failed call targeted, when known
    pub fn endpoint(&self) -> Option<EndpointName> {
        match self {
            BridgeError::InvalidResponse { endpoint, .. }
            | BridgeError::NoResponse { endpoint, .. }
            | BridgeError::Cancelled { endpoint }
            | BridgeError::Encode { endpoint, .. }
            | BridgeError::Decode { endpoint, .. } => Some(*endpoint),
            BridgeError::ChannelClosed => None,
        }
    }

    /// True for failures where the extension never answered
    pub fn is_no_response(&self) -> bool {
        matches!(self, BridgeError::NoResponse { .. })
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
