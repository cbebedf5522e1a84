use super::*;
use crate::config::SonarrConfig;
use crate::types::{EpisodeId, SeriesId};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SonarrClient {
    SonarrClient::new(
        &SonarrConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn commands_carry_the_api_key_and_exact_payloads() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/command"))
        .and(header("X-Api-Key", "test-key"))
        .and(body_json(json!({ "name": "RssSync" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({ "name": "EpisodeSearch", "episodeIds": [42] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({ "name": "RescanSeries", "seriesId": 5 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client.trigger_rss_sync().await.unwrap();
    client.search_episode(EpisodeId(42)).await.unwrap();
    client.rescan_series(SeriesId(5)).await.unwrap();
}

#[tokio::test]
async fn command_failure_maps_to_unexpected_status() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/command"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.trigger_rss_sync().await.unwrap_err();
    match err {
        Error::UnexpectedStatus { status, endpoint } => {
            assert_eq!(status, 500);
            assert!(endpoint.ends_with("/command"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_queue_decodes_records_in_service_order() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {
                    "id": 11,
                    "title": "Show.S01E01.sample",
                    "episodeId": 1,
                    "seriesId": 5,
                    "downloadId": "d1",
                    "outputPath": "/downloads/x",
                    "statusMessages": []
                },
                { "id": 12, "title": "Show.S01E02.1080p" }
            ]
        })))
        .mount(&server)
        .await;

    let queue = client.fetch_queue().await.unwrap();

    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id, Some(11));
    assert_eq!(queue[0].episode_id, Some(EpisodeId(1)));
    assert_eq!(queue[0].download_id.as_deref(), Some("d1"));
    assert_eq!(queue[1].title.as_deref(), Some("Show.S01E02.1080p"));
}

#[tokio::test]
async fn fetch_queue_without_records_is_empty() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "page": 1 })))
        .mount(&server)
        .await;

    assert!(client.fetch_queue().await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_queue_with_non_array_records_is_malformed() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": 5 })))
        .mount(&server)
        .await;

    let err = client.fetch_queue().await.unwrap_err();
    assert!(matches!(err, Error::MalformedQueue(_)), "got {err:?}");
}

#[tokio::test]
async fn fetch_queue_with_non_object_payload_is_malformed() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let err = client.fetch_queue().await.unwrap_err();
    assert!(matches!(err, Error::MalformedQueue(_)), "got {err:?}");
}

#[tokio::test]
async fn fetch_queue_skips_records_it_cannot_decode() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                { "id": 11, "episodeId": "not-a-number" },
                { "id": 12, "title": "Show.S01E02.1080p" }
            ]
        })))
        .mount(&server)
        .await;

    let queue = client.fetch_queue().await.unwrap();

    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, Some(12));
}

#[tokio::test]
async fn fetch_queue_http_failure_maps_to_unexpected_status() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.fetch_queue().await.unwrap_err();
    assert!(
        matches!(err, Error::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn history_is_scoped_to_the_series() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/history"))
        .and(query_param("seriesId", "5"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {
                    "sourceTitle": "Show.S01E01.sample",
                    "guid": "guid-1",
                    "indexerId": 7,
                    "seriesId": 5,
                    "episodeId": 1
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = client.fetch_series_history(SeriesId(5)).await.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].guid.as_deref(), Some("guid-1"));
    assert_eq!(history[0].episode_id, Some(EpisodeId(1)));
}

#[tokio::test]
async fn history_with_non_array_records_is_a_shape_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "records": { "oops": true } })),
        )
        .mount(&server)
        .await;

    let err = client.fetch_series_history(SeriesId(5)).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape(_)), "got {err:?}");
}

#[tokio::test]
async fn block_release_posts_the_unapproval_payload() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/release"))
        .and(header("X-Api-Key", "test-key"))
        .and(body_json(json!({
            "title": "Show.S01E01.sample",
            "guid": "guid-1",
            "indexerId": 7,
            "seriesId": 5,
            "approved": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = BlockRequest::unapproved(
        "Show.S01E01.sample".to_string(),
        "guid-1".to_string(),
        7,
        SeriesId(5),
    );
    client.block_release(&request).await.unwrap();
}

#[tokio::test]
async fn delete_queue_item_returns_the_raw_status() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("DELETE"))
        .and(path("/queue/11"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    // A non-2xx answer is data here, not an error; the caller owns the policy
    assert_eq!(client.delete_queue_item(11).await.unwrap(), 404);
}

#[test]
fn new_rejects_an_empty_api_key() {
    let err = SonarrClient::new(
        &SonarrConfig {
            base_url: "http://localhost:8989/api/v3".to_string(),
            api_key: String::new(),
        },
        Duration::from_secs(5),
    )
    .unwrap_err();

    match err {
        Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("sonarr.api_key")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn new_rejects_an_unparseable_base_url() {
    let err = SonarrClient::new(
        &SonarrConfig {
            base_url: "not a url".to_string(),
            api_key: "k".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap_err();

    match err {
        Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("sonarr.base_url")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn new_trims_a_trailing_slash_from_the_base_url() {
    let client = SonarrClient::new(
        &SonarrConfig {
            base_url: "http://localhost:8989/api/v3/".to_string(),
            api_key: "k".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap();

    assert_eq!(client.base_url, "http://localhost:8989/api/v3");
}
