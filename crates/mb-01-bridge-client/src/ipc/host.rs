//! Extension-side responder.
//!
//! Listens on the request topic, decodes each envelope into an
//! [`ExtensionRequest`] and answers with a `RESPONSE` envelope that echoes the
//! endpoint and correlation ID. There is no error envelope in the protocol:
//! a request that cannot be decoded or handled gets no answer at all, and the
//! caller sees its deadline expire.

use async_trait::async_trait;
use shared_bus::{BridgeEvent, EventChannel};
use shared_types::{BridgeEnvelope, EndpointName, ExtensionRequest};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Failure inside an extension handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The source does not implement this endpoint
    #[error("endpoint {0} not supported")]
    Unsupported(EndpointName),

    /// Unknown source id
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Scraping or upstream failure
    #[error("handler failed: {0}")]
    Failed(String),
}

/// Implements the endpoint catalog on the extension side.
#[async_trait]
pub trait ExtensionHandler: Send + Sync + 'static {
    /// Produce the `data` of the response to `request`.
    async fn handle(&self, request: ExtensionRequest) -> Result<serde_json::Value, HandlerError>;
}

/// Running extension responder. Dropping the handle leaves it running; call
/// [`ExtensionHost::shutdown`] to stop it.
pub struct ExtensionHost {
    task: JoinHandle<()>,
}

impl ExtensionHost {
    /// Subscribe to requests on `channel` and answer them with `handler`.
    ///
    /// The subscription is taken before this returns, so requests emitted
    /// afterwards are never missed.
    pub fn spawn<H: ExtensionHandler>(channel: Arc<dyn EventChannel>, handler: Arc<H>) -> Self {
        let mut requests = channel.on_request();

        let task = tokio::spawn(async move {
            info!("[ExtensionHost] Listening for bridge requests");

            while let Some(event) = requests.recv().await {
                let BridgeEvent::Request(envelope) = event else {
                    continue;
                };

                let channel = Arc::clone(&channel);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    respond(channel.as_ref(), handler.as_ref(), envelope).await;
                });
            }

            debug!("[ExtensionHost] Request stream closed");
        });

        Self { task }
    }

    /// Stop answering requests.
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

async fn respond<H: ExtensionHandler>(
    channel: &dyn EventChannel,
    handler: &H,
    envelope: BridgeEnvelope,
) {
    let Some(endpoint) = envelope.endpoint_name() else {
        warn!(endpoint = %envelope.endpoint, "Request for unknown endpoint, no response");
        return;
    };

    let request = match ExtensionRequest::decode(endpoint, envelope.data.clone()) {
        Ok(request) => request,
        Err(e) => {
            warn!(
                endpoint = %endpoint,
                error = %e,
                "Malformed request payload, no response"
            );
            return;
        }
    };

    match handler.handle(request).await {
        Ok(data) => {
            let response = BridgeEnvelope::response_to(&envelope, data);
            let receivers = channel.emit_response(response).await;
            debug!(
                endpoint = %endpoint,
                correlation_id = ?envelope.correlation_id,
                receivers = receivers,
                "Response emitted"
            );
        }
        Err(e) => {
            warn!(
                endpoint = %endpoint,
                correlation_id = ?envelope.correlation_id,
                error = %e,
                "Handler failed, no response"
            );
        }
    }
}
