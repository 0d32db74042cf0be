//! A stub timetable API served from an ephemeral local port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

/// Origin that makes the stub answer with an unparseable body.
pub const BROKEN_ORIGIN: &str = "Broken";

/// Origin that makes the stub answer 503.
pub const DOWN_ORIGIN: &str = "Nowhere";

/// Completion term that makes the stub answer 500.
pub const FAILING_TERM: &str = "fail";

/// Completion term with no matches.
pub const UNKNOWN_TERM: &str = "zzz";

#[derive(Default)]
pub struct Hits {
    pub routes: AtomicUsize,
    pub completions: AtomicUsize,
    pub last_route_query: Mutex<Option<String>>,
    pub last_completion_query: Mutex<Option<String>>,
}

impl Hits {
    pub fn routes(&self) -> usize {
        self.routes.load(Ordering::SeqCst)
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn last_route_query(&self) -> String {
        self.last_route_query.lock().unwrap().clone().unwrap_or_default()
    }

    pub fn last_completion_query(&self) -> String {
        self.last_completion_query
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default()
    }
}

pub struct Upstream {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

/// Start the stub and return its base URL.
pub async fn spawn_upstream() -> Upstream {
    let hits = Arc::new(Hits::default());

    let app = Router::new()
        .route("/api/route.json", get(route))
        .route("/api/completion.json", get(completion))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        base_url: format!("http://{addr}/api"),
        hits,
    }
}

async fn route(
    State(hits): State<Arc<Hits>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.routes.fetch_add(1, Ordering::SeqCst);
    *hits.last_route_query.lock().unwrap() = raw;

    let from = params.get("from").map(String::as_str).unwrap_or_default();
    match from {
        BROKEN_ORIGIN => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        DOWN_ORIGIN => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Json(thun_bern_route()).into_response(),
    }
}

async fn completion(
    State(hits): State<Arc<Hits>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.completions.fetch_add(1, Ordering::SeqCst);
    *hits.last_completion_query.lock().unwrap() = raw;

    let term = params.get("term").cloned().unwrap_or_default();
    match term.as_str() {
        FAILING_TERM => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        UNKNOWN_TERM => Json(json!([])).into_response(),
        _ => Json(json!([
            { "label": format!("{term} Bahnhof"), "id": "8507000" },
            { "html": "<b>no label</b>" },
            { "label": format!("{term} Zentrum") }
        ]))
        .into_response(),
    }
}

/// Two connections from Thun to Bern, upper-camel like the live API.
pub fn thun_bern_route() -> Value {
    json!({
        "Count": 2,
        "Connections": [
            connection("08:12", "08:47"),
            connection("08:42", "09:17"),
        ]
    })
}

fn connection(departure: &str, arrival: &str) -> Value {
    let departure = format!("2024-03-15 {departure}:00");
    let arrival = format!("2024-03-15 {arrival}:00");
    json!({
        "From": "Thun",
        "Departure": departure,
        "To": "Bern",
        "Arrival": arrival,
        "Duration": 2100,
        "Legs": [
            {
                "Name": "Thun",
                "Departure": departure,
                "Line": "S1",
                "Type": "strain",
                "TypeName": "S-Bahn",
                "Runningtime": 2100,
                "Exit": { "Name": "Bern", "Arrival": arrival }
            },
            { "Name": "Bern" }
        ]
    })
}
