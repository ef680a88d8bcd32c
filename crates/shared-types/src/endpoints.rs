//! # Endpoint Catalog
//!
//! The closed set of calls the page can make to the extension.
//!
//! Each endpoint is a zero-sized marker type implementing [`Endpoint`], which
//! ties the wire name to its request and response types:
//!
//! ```text
//! GetEpisodes ── NAME ──────→ "get-episodes"
//!             ── Request ───→ EpisodesRequest
//!             └─ Response ──→ Vec<Episode>
//! ```
//!
//! The extension side decodes incoming envelopes into [`ExtensionRequest`],
//! one variant per endpoint.

use crate::media::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A typed request/response contract.
pub trait Endpoint {
    /// Wire name.
    const NAME: EndpointName;
    /// Payload sent in the request envelope's `data`.
    type Request: Serialize + Send + Sync;
    /// Payload expected in the response envelope's `data`.
    type Response: DeserializeOwned + Send;
}

/// Error for endpoint names outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint: {0}")]
pub struct UnknownEndpoint(pub String);

macro_rules! endpoint_catalog {
    ($(
        $(#[$meta:meta])*
        $marker:ident => $wire:literal, $request:ty => $response:ty;
    )*) => {
        /// Every endpoint name the bridge understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EndpointName {
            $( #[serde(rename = $wire)] $marker, )*
        }

        impl EndpointName {
            pub const ALL: &'static [EndpointName] = &[$(EndpointName::$marker),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( EndpointName::$marker => $wire, )*
                }
            }
        }

        impl FromStr for EndpointName {
            type Err = UnknownEndpoint;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(EndpointName::$marker), )*
                    other => Err(UnknownEndpoint(other.to_string())),
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $marker;

            impl Endpoint for $marker {
                const NAME: EndpointName = EndpointName::$marker;
                type Request = $request;
                type Response = $response;
            }
        )*

        /// A decoded request, as seen by the extension.
        #[derive(Debug, Clone, PartialEq)]
        pub enum ExtensionRequest {
            $( $marker($request), )*
        }

        impl ExtensionRequest {
            pub fn endpoint(&self) -> EndpointName {
                match self {
                    $( ExtensionRequest::$marker(_) => EndpointName::$marker, )*
                }
            }

            /// Decode the `data` of a request envelope for `endpoint`.
            pub fn decode(
                endpoint: EndpointName,
                data: serde_json::Value,
            ) -> Result<Self, serde_json::Error> {
                Ok(match endpoint {
                    $( EndpointName::$marker => ExtensionRequest::$marker(serde_json::from_value(data)?), )*
                })
            }
        }
    };
}

endpoint_catalog! {
    /// Resolve a catalog media record into a source-specific anime id.
    GetAnimeId => "get-anime-id", MediaIdRequest => MediaIdResponse;
    /// Resolve a catalog media record into a source-specific manga id.
    GetMangaId => "get-manga-id", MediaIdRequest => MediaIdResponse;
    /// Ordered episode list for a resolved anime id.
    GetEpisodes => "get-episodes", EpisodesRequest => Vec<Episode>;
    /// Ordered chapter list for a resolved manga id.
    GetChapters => "get-chapters", ChaptersRequest => Vec<Chapter>;
    /// Playback server options for one episode.
    GetVideoServers => "get-video-servers", VideoServersRequest => Vec<VideoServer>;
    /// Playable and subtitle files behind one server.
    GetVideoContainer => "get-video-container", VideoContainerRequest => VideoContainer;
    /// Page images for one chapter.
    GetImages => "get-images", ImagesRequest => Vec<FileUrl>;
    /// Register headers the browser must attach when fetching the given URLs.
    UpdateRules => "update-rules", UpdateRulesRequest => RulesAck;
    SearchAnime => "search-anime", SearchRequest => Vec<SearchResult>;
    SearchManga => "search-manga", SearchRequest => Vec<SearchResult>;
    GetAnimeSources => "get-anime-sources", () => Vec<SourceDescriptor>;
    GetMangaSources => "get-manga-sources", () => Vec<SourceDescriptor>;
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
