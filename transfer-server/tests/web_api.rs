//! The HTTP API end to end, against a stub timetable.

mod common;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::{Value, json};
use tempfile::tempdir;

use common::{DOWN_ORIGIN, Upstream, spawn_upstream};
use transfer_server::appointment::{
    AppointmentDraft, AppointmentError, CalendarIntegration, IcsOutbox, Locale,
};
use transfer_server::cache::{CacheConfig, CachedTimetableClient};
use transfer_server::completion::CompletionClient;
use transfer_server::favourites::{FavouriteStop, FavouriteStops};
use transfer_server::timetable::{TimetableClient, TimetableConfig};
use transfer_server::web::{AppState, create_router};

struct ReadOnlyCalendar;

impl CalendarIntegration for ReadOnlyCalendar {
    fn open_new_appointment(&self, _draft: &AppointmentDraft) -> Result<(), AppointmentError> {
        Err(AppointmentError::IntegrationUnavailable(
            "mailbox is read-only".into(),
        ))
    }
}

fn state(upstream: &Upstream) -> AppState {
    let config = TimetableConfig::new().with_base_url(&upstream.base_url);
    let timetable = TimetableClient::new(config.clone()).unwrap();
    let completion = CompletionClient::new(config).unwrap();
    let cached = CachedTimetableClient::new(timetable, completion, &CacheConfig::default());
    let favourites = FavouriteStops::new([FavouriteStop::new("Thun", 3)]);

    AppState::new(cached, favourites)
}

/// Serve the app on an ephemeral port and return its base URL.
async fn serve(state: AppState) -> String {
    let app = create_router(state, "static");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn inbound_transfer() -> Value {
    json!({
        "direction": "inbound",
        "meeting": {
            "subject": "Planning",
            "location": "Bundesplatz 3",
            "start": "2024-03-15T09:00:00",
        },
        "meetingStop": "Bern",
        "endpointStop": "Thun",
        "meetingWalkMinutes": 5
    })
}

#[tokio::test]
async fn health() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn connections_as_json() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/connections"))
        .json(&json!({
            "from": "Thun",
            "to": "Bern",
            "dateTime": "2024-03-15 08:00:00",
            "limit": 2
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 2);
    let first = &body["connections"][0];
    assert_eq!(first["From"], "Thun");
    assert_eq!(first["DepartureTime"], "08:12");
    assert_eq!(first["ArrivalTime"], "08:47");
    assert_eq!(first["DurationText"], "35’");
    assert_eq!(first["Transfers"], 0);
    assert_eq!(first["Legs"][0]["Type"], "strain");
    assert_eq!(first["Legs"][0]["Runningtime"], 2100);

    let query = upstream.hits.last_route_query();
    assert!(query.contains("time_type=depart&num=2&pre=1"), "{query}");
}

#[tokio::test]
async fn connections_as_html() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/connections"))
        .header(ACCEPT, "text/html")
        .json(&json!({ "from": "Thun", "to": "Bern" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert_eq!(html.matches("<tr data-index=").count(), 2);
    assert!(html.contains("08:12"));
    assert!(!html.contains("owptt-row-selected"));
}

#[tokio::test]
async fn blank_stop_is_bad_request() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/connections"))
        .json(&json!({ "from": "  ", "to": "Bern" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.hits.routes(), 0);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Bad request");
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/connections"))
        .json(&json!({ "from": DOWN_ORIGIN, "to": "Bern" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"], "HTTP 503 Service Unavailable");
}

#[tokio::test]
async fn transfer_then_appointment() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;
    let client = reqwest::Client::new();

    let transfer: Value = client
        .post(format!("{base}/api/transfer"))
        .json(&inbound_transfer())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Inbound: arrive by 08:55, preselect the last connection
    let query = upstream.hits.last_route_query();
    assert!(query.contains("from=Thun&to=Bern"), "{query}");
    assert!(query.contains("time=08%3A55&time_type=arrival&num=1&pre=5"), "{query}");
    assert_eq!(transfer["selected"], 1);

    let context = &transfer["context"];
    assert_eq!(context["from"], "Thun");
    assert_eq!(context["meetingWalkMinutes"], 5);
    assert_eq!(context["endpointWalkMinutes"], 3);

    let response = client
        .post(format!("{base}/api/appointment"))
        .json(&json!({
            "connection": transfer["connections"][0],
            "context": context,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let draft: AppointmentDraft = response.json().await.unwrap();
    assert_eq!(draft.start.to_string(), "2024-03-15 08:09:00");
    assert_eq!(draft.end.to_string(), "2024-03-15 08:52:00");
    assert_eq!(draft.subject, "Transfer Thun–Bern");
    assert!(draft.location.contains("S1"));
}

#[tokio::test]
async fn appointment_uses_request_locale() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream).with_locale(Locale::DeCh)).await;
    let client = reqwest::Client::new();

    let connection = json!({
        "From": "Thun",
        "Departure": "2024-03-15 08:12:00",
        "To": "Bern",
        "Arrival": "2024-03-15 08:47:00",
    });

    let draft: AppointmentDraft = client
        .post(format!("{base}/api/appointment"))
        .json(&json!({ "connection": connection, "locale": "fr-CH" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(draft.subject, "Transfert Thun–Bern");

    let draft: AppointmentDraft = client
        .post(format!("{base}/api/appointment"))
        .json(&json!({ "connection": connection }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(draft.location, "Öffentlicher Verkehr");
}

#[tokio::test]
async fn appointment_without_times_is_bad_request() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/appointment"))
        .json(&json!({ "connection": { "From": "Thun", "To": "Bern" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_walks_are_bad_requests() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/appointment"))
        .json(&json!({
            "connection": {
                "From": "Thun",
                "Departure": "2024-03-15 08:12:00",
                "To": "Bern",
                "Arrival": "2024-03-15 08:47:00",
            },
            "context": { "meetingWalkMinutes": i64::MAX }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut transfer = inbound_transfer();
    transfer["meetingWalkMinutes"] = json!(i64::MAX);
    let response = client
        .post(format!("{base}/api/transfer"))
        .json(&transfer)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.hits.routes(), 0);
}

#[tokio::test]
async fn unavailable_calendar_is_503() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream).with_calendar(ReadOnlyCalendar)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/appointment"))
        .json(&json!({
            "connection": {
                "From": "Thun",
                "Departure": "2024-03-15 08:12:00",
                "To": "Bern",
                "Arrival": "2024-03-15 08:47:00",
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Calendar integration unavailable");
}

#[tokio::test]
async fn outbox_receives_appointment() {
    let upstream = spawn_upstream().await;
    let dir = tempdir().unwrap();
    let base = serve(state(&upstream).with_calendar(IcsOutbox::new(dir.path()))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/appointment"))
        .json(&json!({
            "connection": {
                "From": "Thun",
                "Departure": "2024-03-15 08:12:00",
                "To": "Bern",
                "Arrival": "2024-03-15 08:47:00",
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let ics = std::fs::read_to_string(&files[0]).unwrap();
    assert!(ics.contains("DTSTART:20240315T081200\r\n"));
    assert!(ics.contains("SUMMARY:Transfer Thun–Bern\r\n"));
}

#[tokio::test]
async fn completion_never_fails() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let suggestions: Value = reqwest::get(format!("{base}/api/completion?term=Bern&show_ids=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(suggestions[0]["label"], "Bern Bahnhof");
    assert_eq!(suggestions[0]["id"], "8507000");
    assert_eq!(
        upstream.hits.last_completion_query(),
        "term=Bern&show_ids=1"
    );

    for url in [
        format!("{base}/api/completion?term=fail"),
        format!("{base}/api/completion"),
    ] {
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json::<Value>().await.unwrap(), json!([]));
    }
}

#[tokio::test]
async fn favourites_are_listed() {
    let upstream = spawn_upstream().await;
    let base = serve(state(&upstream)).await;

    let favourites: Value = reqwest::get(format!("{base}/api/favourites"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(favourites, json!([{ "name": "Thun", "walkMinutes": 3 }]));
}
