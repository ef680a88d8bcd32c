//! Bridge client service - the page side of the bridge.
//!
//! Turns typed endpoint calls into request envelopes and waits for the
//! matching response envelope, bounded by a deadline and an optional
//! cancellation token.

use crate::domain::config::{ClientConfig, ConfigError};
use crate::domain::error::{BridgeError, BridgeResult};
use crate::domain::pending::{PendingGuard, PendingRequestStore, PendingStats, ReplyOutcome};
use crate::domain::rules::RuleSet;
use crate::ipc::router::ResponseRouter;
use crate::ports::inbound::BridgeApi;
use async_trait::async_trait;
use shared_bus::{EventChannel, EventTopic};
use shared_types::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Deadline; falls back to the configured timeout for the endpoint
    pub timeout: Option<Duration>,
    /// Cancels the call locally when triggered
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Page-side bridge client.
///
/// Each call registers its own pending entry before the request is emitted,
/// so concurrent calls on the same endpoint never see each other's responses.
pub struct BridgeClient {
    channel: Arc<dyn EventChannel>,
    pending: Arc<PendingRequestStore>,
    config: ClientConfig,
    router: JoinHandle<()>,
}

impl BridgeClient {
    /// Create a client on `channel` and start its response router.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(channel: Arc<dyn EventChannel>, config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let pending = Arc::new(PendingRequestStore::new());

        // Subscribe before spawning so no response can slip past the router
        let router = ResponseRouter::new(channel.on_response(), Arc::clone(&pending));
        let router = tokio::spawn(router.run());

        Ok(Self {
            channel,
            pending,
            config,
            router,
        })
    }

    /// Call endpoint `E` with the configured deadline.
    pub async fn call<E: Endpoint>(&self, request: E::Request) -> BridgeResult<E::Response> {
        self.call_with::<E>(request, CallOptions::default()).await
    }

    /// Call endpoint `E` with per-call options.
    pub async fn call_with<E: Endpoint>(
        &self,
        request: E::Request,
        options: CallOptions,
    ) -> BridgeResult<E::Response> {
        let endpoint = E::NAME;

        if self.router.is_finished() {
            return Err(BridgeError::ChannelClosed);
        }

        let data = serde_json::to_value(&request)
            .map_err(|source| BridgeError::Encode { endpoint, source })?;
        let timeout = options
            .timeout
            .unwrap_or_else(|| self.config.timeouts.for_endpoint(endpoint));
        let cancel = options.cancel.unwrap_or_default();

        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled { endpoint });
        }

        // Listener first, then emit
        let (correlation_id, rx) = self.pending.register(endpoint);
        let _guard = PendingGuard::new(&self.pending, correlation_id);

        if self.channel.listener_count(EventTopic::Request) == 0 {
            warn!(
                correlation_id = %correlation_id,
                endpoint = %endpoint,
                "No extension listening for requests"
            );
        }

        let receivers = self
            .channel
            .emit_request(BridgeEnvelope::request(endpoint, correlation_id, data))
            .await;

        debug!(
            correlation_id = %correlation_id,
            endpoint = %endpoint,
            receivers = receivers,
            timeout_ms = timeout.as_millis(),
            "Sent bridge request"
        );

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(correlation_id = %correlation_id, endpoint = %endpoint, "Call cancelled");
                return Err(BridgeError::Cancelled { endpoint });
            }
            result = tokio::time::timeout(timeout, rx) => result,
        };

        match reply {
            Ok(Ok(reply)) => match reply.outcome {
                ReplyOutcome::Data(data) => {
                    debug!(
                        correlation_id = %correlation_id,
                        endpoint = %endpoint,
                        elapsed_ms = reply.response_time.as_millis(),
                        "Bridge call resolved"
                    );
                    serde_json::from_value(data)
                        .map_err(|source| BridgeError::Decode { endpoint, source })
                }
                ReplyOutcome::Invalid(message_type) => {
                    warn!(
                        correlation_id = %correlation_id,
                        endpoint = %endpoint,
                        message_type = %message_type,
                        "Protocol violation in bridge response"
                    );
                    Err(BridgeError::InvalidResponse {
                        endpoint,
                        message_type,
                    })
                }
            },
            Ok(Err(_)) => Err(BridgeError::ChannelClosed),
            Err(_) => {
                self.pending.expire(&correlation_id);
                Err(BridgeError::NoResponse { endpoint, timeout })
            }
        }
    }

    /// Tell the extension which playback files need headers attached.
    ///
    /// Files without headers are dropped; if none remain no request is sent.
    /// Failures are logged and otherwise ignored.
    pub async fn register_playback_rules<I>(&self, files: I)
    where
        I: IntoIterator<Item = FileUrl>,
    {
        let rules = RuleSet::from_files(files);
        if rules.is_empty() {
            debug!("No files with headers, skipping update-rules");
            return;
        }

        let count = rules.len();
        match self.call::<UpdateRules>(rules.into_request()).await {
            Ok(RulesAck) => debug!(files = count, "Playback rules registered"),
            Err(e) => warn!(files = count, error = %e, "Failed to register playback rules"),
        }
    }

    /// Get number of in-flight calls
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    /// Get pending call statistics
    pub fn stats(&self) -> &PendingStats {
        self.pending.stats()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True while the response router is alive
    pub fn is_running(&self) -> bool {
        !self.router.is_finished()
    }

    /// Stop the response router. In-flight calls end with `NoResponse`.
    pub fn shutdown(&self) {
        self.router.abort();
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        self.router.abort();
    }
}

#[async_trait]
impl BridgeApi for BridgeClient {
    async fn get_anime_id(&self, request: MediaIdRequest) -> BridgeResult<MediaIdResponse> {
        self.call::<GetAnimeId>(request).await
    }

    async fn get_manga_id(&self, request: MediaIdRequest) -> BridgeResult<MediaIdResponse> {
        self.call::<GetMangaId>(request).await
    }

    async fn get_episodes(&self, request: EpisodesRequest) -> BridgeResult<Vec<Episode>> {
        self.call::<GetEpisodes>(request).await
    }

    async fn get_chapters(&self, request: ChaptersRequest) -> BridgeResult<Vec<Chapter>> {
        self.call::<GetChapters>(request).await
    }

    async fn get_video_servers(
        &self,
        request: VideoServersRequest,
    ) -> BridgeResult<Vec<VideoServer>> {
        self.call::<GetVideoServers>(request).await
    }

    async fn get_video_container(
        &self,
        request: VideoContainerRequest,
    ) -> BridgeResult<VideoContainer> {
        self.call::<GetVideoContainer>(request).await
    }

    async fn get_images(&self, request: ImagesRequest) -> BridgeResult<Vec<FileUrl>> {
        self.call::<GetImages>(request).await
    }

    async fn update_rules(&self, file_urls: Vec<FileUrl>) -> BridgeResult<()> {
        self.call::<UpdateRules>(UpdateRulesRequest { file_urls })
            .await
            .map(|RulesAck| ())
    }

    async fn search_anime(&self, request: SearchRequest) -> BridgeResult<Vec<SearchResult>> {
        self.call::<SearchAnime>(request).await
    }

    async fn search_manga(&self, request: SearchRequest) -> BridgeResult<Vec<SearchResult>> {
        self.call::<SearchManga>(request).await
    }

    async fn get_anime_sources(&self) -> BridgeResult<Vec<SourceDescriptor>> {
        self.call::<GetAnimeSources>(()).await
    }

    async fn get_manga_sources(&self) -> BridgeResult<Vec<SourceDescriptor>> {
        self.call::<GetMangaSources>(()).await
    }
}
