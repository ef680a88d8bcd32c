//! # Endpoint Payloads
//!
//! Request and response bodies for the endpoint catalog. Field names follow
//! the camelCase convention of the page/extension wire format.
//!
//! `extra_data` is owned by the extension: it hands it out with one response
//! and expects it back, unchanged, on the follow-up request.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Opaque extension-owned data.
pub type ExtraData = serde_json::Value;

// =============================================================================
// SHARED
// =============================================================================

/// Catalog-neutral media record from the metadata provider.
///
/// Only `id` is interpreted; every other field is forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnilistMedia {
    pub id: u64,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl AnilistMedia {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            details: serde_json::Map::new(),
        }
    }
}

/// A media file URL plus the headers the browser must send to fetch it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl FileUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// True when at least one header must be attached on fetch.
    pub fn has_headers(&self) -> bool {
        self.headers.as_ref().is_some_and(|h| !h.is_empty())
    }
}

/// A content source registered in the extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

// =============================================================================
// ID RESOLUTION / SEARCH
// =============================================================================

/// `get-anime-id` / `get-manga-id` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaIdRequest {
    pub source_id: String,
    pub anilist: AnilistMedia,
}

/// Source-specific id for a catalog media record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaIdResponse {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<ExtraData>,
}

/// `search-anime` / `search-manga` request. `query` falls back to the
/// media title on the extension side when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub source_id: String,
    pub anilist: AnilistMedia,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

// =============================================================================
// UNIT LISTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesRequest {
    pub anime_id: String,
    pub source_id: String,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub number: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_filler: bool,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaptersRequest {
    pub manga_id: String,
    pub source_id: String,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub number: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

// =============================================================================
// PLAYBACK / READING
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoServersRequest {
    pub episode_id: String,
    pub source_id: String,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

/// A playback server option for one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoServer {
    pub name: String,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContainerRequest {
    pub video_server: VideoServer,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
    pub source_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub file: FileUrl,
    #[serde(default)]
    pub quality: Option<String>,
    /// Container format hint (`hls`, `dash`, `mp4`).
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtitle {
    pub file: FileUrl,
    pub language: String,
    #[serde(default)]
    pub format: Option<String>,
}

/// Playable files resolved from one video server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoContainer {
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

impl VideoContainer {
    /// Every file URL in the container, videos first.
    pub fn files(&self) -> impl Iterator<Item = &FileUrl> {
        self.videos
            .iter()
            .map(|v| &v.file)
            .chain(self.subtitles.iter().map(|s| &s.file))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesRequest {
    pub chapter_id: String,
    pub source_id: String,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

/// `update-rules` request: headers to attach on later fetches of these URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRulesRequest {
    pub file_urls: Vec<FileUrl>,
}

/// `update-rules` acknowledgement. Any `data` the extension sends back is
/// accepted and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RulesAck;

impl<'de> Deserialize<'de> for RulesAck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer).map(|_| RulesAck)
    }
}
