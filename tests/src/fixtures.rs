//! # Test Fixtures
//!
//! - [`ScriptedExtension`]: captures request envelopes so a test decides
//!   exactly what (and when) the extension answers
//! - [`CatalogHandler`]: a canned extension handler covering the catalog

use async_trait::async_trait;
use mb_01_bridge_client::{BridgeClient, ClientConfig, ExtensionHandler, HandlerError};
use serde_json::{json, Value};
use shared_bus::{BridgeEvent, EventChannel, InMemoryEventBus, Subscription};
use shared_types::{BridgeEnvelope, ExtensionRequest, MessageType};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Bus plus a client attached to it.
pub fn client_on_new_bus() -> (Arc<InMemoryEventBus>, Arc<BridgeClient>) {
    let bus = Arc::new(InMemoryEventBus::new());
    let client = BridgeClient::new(bus.clone(), ClientConfig::default())
        .expect("default config is valid");
    (bus, Arc::new(client))
}

/// Extension stand-in driven by the test.
pub struct ScriptedExtension {
    bus: Arc<InMemoryEventBus>,
    requests: Subscription,
}

impl ScriptedExtension {
    pub fn attach(bus: &Arc<InMemoryEventBus>) -> Self {
        Self {
            bus: Arc::clone(bus),
            requests: bus.on_request(),
        }
    }

    /// Next request envelope seen on the bus.
    pub async fn next_request(&mut self) -> BridgeEnvelope {
        let event = timeout(Duration::from_secs(5), self.requests.recv())
            .await
            .expect("timed out waiting for a request")
            .expect("bus closed");
        match event {
            BridgeEvent::Request(envelope) => envelope,
            other => panic!("expected request, got {:?}", other),
        }
    }

    /// Answer `request` with a well-formed response.
    pub async fn respond(&self, request: &BridgeEnvelope, data: Value) {
        self.bus
            .emit_response(BridgeEnvelope::response_to(request, data))
            .await;
    }

    /// Publish an arbitrary envelope on the response topic.
    pub async fn emit_raw(&self, envelope: BridgeEnvelope) {
        self.bus.emit_response(envelope).await;
    }

    /// Response as an extension without correlation support would send it.
    pub async fn respond_uncorrelated(&self, request: &BridgeEnvelope, data: Value) {
        self.emit_raw(BridgeEnvelope {
            endpoint: request.endpoint.clone(),
            data,
            message_type: MessageType::Response,
            correlation_id: None,
        })
        .await;
    }
}

/// Canned answers for every endpoint the flows exercise.
pub struct CatalogHandler;

#[async_trait]
impl ExtensionHandler for CatalogHandler {
    async fn handle(&self, request: ExtensionRequest) -> Result<Value, HandlerError> {
        match request {
            ExtensionRequest::GetAnimeId(req) => {
                if req.source_id != "src1" {
                    return Err(HandlerError::SourceNotFound(req.source_id));
                }
                Ok(json!({"data": format!("anime-{}", req.anilist.id)}))
            }
            ExtensionRequest::GetEpisodes(req) => Ok(json!([
                {"id": format!("{}-1", req.anime_id), "number": 1},
                {"id": format!("{}-2", req.anime_id), "number": 2, "isFiller": true}
            ])),
            ExtensionRequest::GetVideoServers(req) => Ok(json!([
                {"name": "primary", "extraData": {"episode": req.episode_id}}
            ])),
            ExtensionRequest::GetVideoContainer(req) => Ok(json!({
                "videos": [{
                    "file": {
                        "url": format!("https://cdn.example/{}.m3u8", req.video_server.name),
                        "headers": {"Referer": "https://example.org"}
                    },
                    "format": "hls"
                }],
                "subtitles": [{
                    "file": {"url": "https://cdn.example/en.vtt"},
                    "language": "en"
                }]
            })),
            ExtensionRequest::GetImages(_) => Ok(json!([
                {"url": "https://img.example/1.jpg"},
                {"url": "https://img.example/2.jpg"}
            ])),
            ExtensionRequest::UpdateRules(_) => Ok(Value::Null),
            ExtensionRequest::SearchManga(_) => Ok(json!([])),
            other => Err(HandlerError::Unsupported(other.endpoint())),
        }
    }
}
