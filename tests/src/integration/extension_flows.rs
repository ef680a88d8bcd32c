//! # Extension Flow Tests
//!
//! Typed client calls answered by an in-process [`ExtensionHost`] running
//! the catalog handler: each endpoint contract end to end, plus the silent
//! failure modes of the extension side.
//!
//! [`ExtensionHost`]: mb_01_bridge_client::ExtensionHost

#[cfg(test)]
mod tests {
    use crate::fixtures::{client_on_new_bus, CatalogHandler};
    use mb_01_bridge_client::{BridgeApi, BridgeError, ExtensionHost};
    use shared_types::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    fn host_with_client() -> (ExtensionHost, Arc<mb_01_bridge_client::BridgeClient>) {
        let (bus, client) = client_on_new_bus();
        let host = ExtensionHost::spawn(bus, Arc::new(CatalogHandler));
        (host, client)
    }

    #[tokio::test]
    async fn test_resolve_anime_then_list_episodes() {
        let (_host, client) = host_with_client();

        let id = client
            .get_anime_id(MediaIdRequest {
                source_id: "src1".into(),
                anilist: AnilistMedia::with_id(21),
            })
            .await
            .unwrap();
        assert_eq!(id.data, "anime-21");

        let episodes = client
            .get_episodes(EpisodesRequest {
                anime_id: id.data.clone(),
                source_id: "src1".into(),
                extra_data: id.extra_data,
            })
            .await
            .unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].id, "anime-21-1");
        assert!(!episodes[0].is_filler);
        assert!(episodes[1].is_filler);
        assert_eq!(episodes[1].number, 2.0);
    }

    #[tokio::test]
    async fn test_video_server_to_container_with_rules() {
        let (_host, client) = host_with_client();

        let servers = client
            .get_video_servers(VideoServersRequest {
                episode_id: "ep-7".into(),
                source_id: "src1".into(),
                extra_data: None,
            })
            .await
            .unwrap();
        assert_eq!(servers[0].name, "primary");
        assert_eq!(
            servers[0].extra_data,
            Some(serde_json::json!({"episode": "ep-7"}))
        );

        let container = client
            .get_video_container(VideoContainerRequest {
                video_server: servers[0].clone(),
                extra_data: None,
                source_id: "src1".into(),
            })
            .await
            .unwrap();

        assert_eq!(container.videos.len(), 1);
        assert_eq!(container.videos[0].file.url, "https://cdn.example/primary.m3u8");
        assert_eq!(container.videos[0].format.as_deref(), Some("hls"));
        assert_eq!(container.subtitles[0].language, "en");

        let files: Vec<FileUrl> = container.files().cloned().collect();
        assert_eq!(files.len(), 2);

        // Only the video carries headers
        client.register_playback_rules(files).await;
        let stats = client.stats();
        assert_eq!(stats.total_completed.load(Ordering::Relaxed), 3);
        assert_eq!(stats.total_timeouts.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_chapter_images() {
        let (_host, client) = host_with_client();

        let images = client
            .get_images(ImagesRequest {
                chapter_id: "ch-1".into(),
                source_id: "src1".into(),
                extra_data: None,
            })
            .await
            .unwrap();

        assert_eq!(
            images.iter().map(|f| f.url.as_str()).collect::<Vec<_>>(),
            vec!["https://img.example/1.jpg", "https://img.example/2.jpg"]
        );
        assert!(images.iter().all(|f| !f.has_headers()));
    }

    #[tokio::test]
    async fn test_empty_search_is_not_an_error() {
        let (_host, client) = host_with_client();

        let results = client
            .search_manga(SearchRequest {
                source_id: "src1".into(),
                anilist: AnilistMedia::with_id(5),
                query: Some("nothing matches".into()),
            })
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_error_surfaces_as_no_response() {
        let (_host, client) = host_with_client();

        let err = client
            .get_anime_id(MediaIdRequest {
                source_id: "missing".into(),
                anilist: AnilistMedia::with_id(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::NoResponse {
                endpoint: EndpointName::GetAnimeId,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_endpoint_times_out() {
        let (_host, client) = host_with_client();

        let err = client.get_manga_sources().await.unwrap_err();

        assert!(err.is_no_response());
        assert_eq!(err.endpoint(), Some(EndpointName::GetMangaSources));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_host_stops_answering() {
        let (host, client) = host_with_client();
        host.shutdown();

        let started = tokio::time::Instant::now();
        let err = client
            .update_rules(vec![FileUrl::new("https://cdn.example/a.m3u8").with_header("Origin", "x")])
            .await
            .unwrap_err();

        assert!(err.is_no_response());
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_update_rules_acknowledged() {
        let (_host, client) = host_with_client();

        client
            .update_rules(vec![FileUrl::new("https://cdn.example/a.m3u8").with_header("Referer", "r")])
            .await
            .unwrap();

        assert_eq!(client.pending_count(), 0);
    }
}
