//! Clients against a local stub of the timetable API.

mod common;

use std::sync::Arc;

use chrono::NaiveDate;

use common::{BROKEN_ORIGIN, DOWN_ORIGIN, FAILING_TERM, UNKNOWN_TERM, spawn_upstream};
use transfer_server::cache::{CacheConfig, CachedTimetableClient};
use transfer_server::completion::{
    CompletionClient, CompletionFeed, CompletionOptions, CompletionSequencer, InputDecision,
};
use transfer_server::timetable::{
    ConnectionsRequest, TimetableClient, TimetableConfig, TimetableError,
};

fn config(base_url: &str) -> TimetableConfig {
    TimetableConfig::new().with_base_url(base_url).with_timeout(5)
}

fn timetable(base_url: &str) -> TimetableClient {
    TimetableClient::new(config(base_url)).unwrap()
}

fn completion(base_url: &str) -> CompletionClient {
    CompletionClient::new(config(base_url)).unwrap()
}

fn morning_request(from: &str) -> ConnectionsRequest {
    let at = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    ConnectionsRequest::new(from, "Bern")
        .unwrap()
        .at(at)
        .with_arrival_time(true)
        .with_limit(5)
}

#[tokio::test]
async fn route_query_parses_upper_camel_payload() {
    let upstream = spawn_upstream().await;
    let client = timetable(&upstream.base_url);

    let response = client.get_connections(&morning_request("Thun")).await.unwrap();

    assert_eq!(response.count, 2);
    assert_eq!(response.connections.len(), 2);
    let first = &response.connections[0];
    assert_eq!(first.from, "Thun");
    assert_eq!(first.to, "Bern");
    assert_eq!(first.duration(), 2100);
    assert_eq!(first.legs[0].line.as_deref(), Some("S1"));
    assert_eq!(first.legs[0].running_secs, 2100);

    assert_eq!(
        upstream.hits.last_route_query(),
        "from=Thun&to=Bern&date=15.03.2024&time=09%3A00&time_type=arrival&num=1&pre=5"
    );
}

#[tokio::test]
async fn error_status_is_http_error() {
    let upstream = spawn_upstream().await;
    let client = timetable(&upstream.base_url);

    let err = client
        .get_connections(&morning_request(DOWN_ORIGIN))
        .await
        .unwrap_err();

    match err {
        TimetableError::Http {
            status,
            status_text,
        } => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Service Unavailable");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_json_error_with_preview() {
    let upstream = spawn_upstream().await;
    let client = timetable(&upstream.base_url);

    let err = client
        .get_connections(&morning_request(BROKEN_ORIGIN))
        .await
        .unwrap_err();

    match err {
        TimetableError::Json { body, .. } => {
            assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
        }
        other => panic!("expected Json error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let client = timetable("http://127.0.0.1:1/api");
    let err = client
        .get_connections(&morning_request("Thun"))
        .await
        .unwrap_err();
    assert!(matches!(err, TimetableError::Transport(_)));
}

#[tokio::test]
async fn completions_keep_labelled_entries() {
    let upstream = spawn_upstream().await;
    let client = completion(&upstream.base_url);

    let suggestions = client
        .fetch_completions("  Bern ", &CompletionOptions::default())
        .await;

    let labels: Vec<_> = suggestions.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Bern Bahnhof", "Bern Zentrum"]);
    assert_eq!(suggestions[0].extra["id"], "8507000");
    assert_eq!(upstream.hits.last_completion_query(), "term=Bern");
}

#[tokio::test]
async fn completion_flags_reach_the_query() {
    let upstream = spawn_upstream().await;
    let client = completion(&upstream.base_url);

    let options = CompletionOptions {
        nofavorites: true,
        show_ids: false,
        show_coordinates: true,
    };
    client.fetch_completions("Thun", &options).await;

    assert_eq!(
        upstream.hits.last_completion_query(),
        "term=Thun&nofavorites=1&show_coordinates=1"
    );
}

#[tokio::test]
async fn completion_failures_are_empty() {
    let upstream = spawn_upstream().await;
    let client = completion(&upstream.base_url);

    assert!(
        client
            .fetch_completions(FAILING_TERM, &CompletionOptions::default())
            .await
            .is_empty()
    );
    assert!(
        completion("http://127.0.0.1:1/api")
            .fetch_completions("Bern", &CompletionOptions::default())
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn blank_term_sends_nothing() {
    let upstream = spawn_upstream().await;
    let client = completion(&upstream.base_url);

    assert!(
        client
            .fetch_completions("   ", &CompletionOptions::default())
            .await
            .is_empty()
    );
    assert_eq!(upstream.hits.completions(), 0);
}

#[tokio::test]
async fn feed_looks_up_only_long_enough_terms() {
    let upstream = spawn_upstream().await;
    let client = completion(&upstream.base_url);
    let options = CompletionOptions::default();
    let mut feed = CompletionFeed::new(Arc::new(CompletionSequencer::new()));

    assert_eq!(feed.on_input("Be", &client, &options).await, InputDecision::Cleared);
    assert_eq!(upstream.hits.completions(), 0);
    assert!(feed.suggestions().is_empty());

    let decision = feed.on_input(" Bern ", &client, &options).await;
    assert!(matches!(decision, InputDecision::Lookup { ref term, .. } if term == "Bern"));
    assert_eq!(upstream.hits.completions(), 1);
    let labels: Vec<_> = feed.suggestions().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Bern Bahnhof", "Bern Zentrum"]);

    assert_eq!(feed.on_input("Bern", &client, &options).await, InputDecision::Unchanged);
    assert_eq!(upstream.hits.completions(), 1);

    assert_eq!(feed.on_input("B", &client, &options).await, InputDecision::Cleared);
    assert!(feed.suggestions().is_empty());
    assert_eq!(upstream.hits.completions(), 1);
}

#[tokio::test]
async fn cache_reuses_route_answers() {
    let upstream = spawn_upstream().await;
    let cached = CachedTimetableClient::new(
        timetable(&upstream.base_url),
        completion(&upstream.base_url),
        &CacheConfig::default(),
    );

    let first = cached.get_connections(&morning_request("Thun")).await.unwrap();
    let second = cached.get_connections(&morning_request("Thun")).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(upstream.hits.routes(), 1);

    let other = morning_request("Thun").with_limit(2);
    cached.get_connections(&other).await.unwrap();
    assert_eq!(upstream.hits.routes(), 2);

    cached.invalidate_cache();
    cached.get_connections(&morning_request("Thun")).await.unwrap();
    assert_eq!(upstream.hits.routes(), 3);
}

#[tokio::test]
async fn cache_skips_errors_and_empty_completions() {
    let upstream = spawn_upstream().await;
    let cached = CachedTimetableClient::new(
        timetable(&upstream.base_url),
        completion(&upstream.base_url),
        &CacheConfig::default(),
    );

    for _ in 0..2 {
        assert!(
            cached
                .get_connections(&morning_request(DOWN_ORIGIN))
                .await
                .is_err()
        );
    }
    assert_eq!(upstream.hits.routes(), 2);

    let options = CompletionOptions::default();
    for _ in 0..2 {
        assert!(cached.fetch_completions(UNKNOWN_TERM, &options).await.is_empty());
    }
    assert_eq!(upstream.hits.completions(), 2);

    let first = cached.fetch_completions("Bern", &options).await;
    let second = cached.fetch_completions(" Bern ", &options).await;
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(upstream.hits.completions(), 3);
}
