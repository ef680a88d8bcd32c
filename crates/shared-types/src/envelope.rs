//! # `BridgeEnvelope`
//!
//! The message carried by both bridge events.
//!
//! ```text
//! { "endpoint": "get-episodes", "data": {...}, "type": "REQUEST", "correlationId": "0190..." }
//! ```
//!
//! - **Endpoint**: Free-form string on the wire; the typed side only ever
//!   emits names from `EndpointName`.
//! - **Type**: `REQUEST` or `RESPONSE`. Anything else is kept verbatim so the
//!   correlator can reject it as a protocol violation.
//! - **Correlation**: Generated per call, echoed by the extension. Absent on
//!   envelopes from extensions that predate correlation ids.

use crate::correlation::CorrelationId;
use crate::endpoints::EndpointName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Request,
    Response,
    /// Any other value seen on the wire.
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Request => "REQUEST",
            MessageType::Response => "RESPONSE",
            MessageType::Other(raw) => raw,
        }
    }
}

impl From<String> for MessageType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "REQUEST" => MessageType::Request,
            "RESPONSE" => MessageType::Response,
            _ => MessageType::Other(raw),
        }
    }
}

impl From<MessageType> for String {
    fn from(message_type: MessageType) -> Self {
        message_type.as_str().to_string()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The message published on the request and response topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeEnvelope {
    /// Endpoint name the message belongs to.
    pub endpoint: String,

    /// Endpoint payload; `null` when the endpoint takes or returns nothing.
    #[serde(default)]
    pub data: serde_json::Value,

    /// `REQUEST` or `RESPONSE`.
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Pairs a response with the request that caused it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl BridgeEnvelope {
    /// Build an outgoing request envelope.
    pub fn request(
        endpoint: EndpointName,
        correlation_id: CorrelationId,
        data: serde_json::Value,
    ) -> Self {
        Self {
            endpoint: endpoint.as_str().to_string(),
            data,
            message_type: MessageType::Request,
            correlation_id: Some(correlation_id),
        }
    }

    /// Build the response to `request`, echoing its endpoint and correlation id.
    pub fn response_to(request: &BridgeEnvelope, data: serde_json::Value) -> Self {
        Self {
            endpoint: request.endpoint.clone(),
            data,
            message_type: MessageType::Response,
            correlation_id: request.correlation_id,
        }
    }

    /// Parse the endpoint name, if it belongs to the catalog.
    pub fn endpoint_name(&self) -> Option<EndpointName> {
        self.endpoint.parse().ok()
    }

    pub fn is_response(&self) -> bool {
        self.message_type == MessageType::Response
    }
}
