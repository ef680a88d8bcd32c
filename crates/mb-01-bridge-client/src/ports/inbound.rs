//! Driving Ports (API - Inbound)

use crate::domain::BridgeResult;
use async_trait::async_trait;
use shared_types::{
    Chapter, ChaptersRequest, Episode, EpisodesRequest, FileUrl, ImagesRequest, MediaIdRequest,
    MediaIdResponse, SearchRequest, SearchResult, SourceDescriptor, VideoContainer,
    VideoContainerRequest, VideoServer, VideoServersRequest,
};

/// Typed view of the endpoint catalog.
///
/// One method per endpoint. Empty lists are valid answers ("nothing found");
/// only protocol violations, deadlines and cancellation are errors.
#[async_trait]
pub trait BridgeApi: Send + Sync {
    /// Resolve the source-specific id of an anime
    async fn get_anime_id(&self, request: MediaIdRequest) -> BridgeResult<MediaIdResponse>;

    /// Resolve the source-specific id of a manga
    async fn get_manga_id(&self, request: MediaIdRequest) -> BridgeResult<MediaIdResponse>;

    /// Ordered episode list
    async fn get_episodes(&self, request: EpisodesRequest) -> BridgeResult<Vec<Episode>>;

    /// Ordered chapter list
    async fn get_chapters(&self, request: ChaptersRequest) -> BridgeResult<Vec<Chapter>>;

    async fn get_video_servers(
        &self,
        request: VideoServersRequest,
    ) -> BridgeResult<Vec<VideoServer>>;

    async fn get_video_container(
        &self,
        request: VideoContainerRequest,
    ) -> BridgeResult<VideoContainer>;

    /// Page images of a chapter
    async fn get_images(&self, request: ImagesRequest) -> BridgeResult<Vec<FileUrl>>;

    /// Register header rules for the given files.
    ///
    /// Sends the list as-is; see `BridgeClient::register_playback_rules` for
    /// the filtered, best-effort variant.
    async fn update_rules(&self, file_urls: Vec<FileUrl>) -> BridgeResult<()>;

    async fn search_anime(&self, request: SearchRequest) -> BridgeResult<Vec<SearchResult>>;

    async fn search_manga(&self, request: SearchRequest) -> BridgeResult<Vec<SearchResult>>;

    /// Sources installed in the extension
    async fn get_anime_sources(&self) -> BridgeResult<Vec<SourceDescriptor>>;

    async fn get_manga_sources(&self) -> BridgeResult<Vec<SourceDescriptor>>;
}
