//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::appointment::{AppointmentError, Locale, create_transfer_appointment};
use crate::completion::Suggestion;
use crate::domain::ConnectionsResponse;
use crate::favourites::FavouriteStop;
use crate::timetable::{TimetableError, parse_connection};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the taskpane's static assets.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/completion", get(completion))
        .route("/api/connections", post(search_connections))
        .route("/api/transfer", post(plan_transfer))
        .route("/api/appointment", post(create_appointment))
        .route("/api/favourites", get(favourites))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stop-name completion. Never fails; problems yield an empty list.
async fn completion(
    State(state): State<AppState>,
    Query(query): Query<CompletionQuery>,
) -> Json<Vec<Suggestion>> {
    let suggestions = state
        .timetable
        .fetch_completions(&query.term, &query.options())
        .await;
    Json(suggestions.as_ref().clone())
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn render_connections(
    response: &ConnectionsResponse,
    selected: Option<usize>,
) -> Result<Response, AppError> {
    let html = ConnectionListTemplate::new(&response.connections, selected)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
    Ok(Html(html).into_response())
}

fn log_connections(response: &ConnectionsResponse) {
    info!(count = response.connections.len(), "route query answered");
    for connection in &response.connections {
        debug!(connection = %connection.short_string());
    }
}

/// Search connections between two stops.
async fn search_connections(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let query: ConnectionsQuery = parse_body(&body)?;
    let request = query.to_request()?;

    let response = state.timetable.get_connections(&request).await?;
    log_connections(&response);

    if accepts_html(&headers) {
        render_connections(&response, None)
    } else {
        Ok(Json(ConnectionsResult::from_response(&response)).into_response())
    }
}

/// Search connections to or from a meeting.
async fn plan_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: TransferRequest = parse_body(&body)?;
    let plan = req.into_plan(&state.favourites);
    let request = plan.request()?;

    let response = state.timetable.get_connections(&request).await?;
    log_connections(&response);

    let selected = plan.default_selection(response.connections.len());

    if accepts_html(&headers) {
        render_connections(&response, selected)
    } else {
        let result = ConnectionsResult::from_response(&response);
        Ok(Json(TransferResult {
            context: plan.context(),
            selected,
            count: result.count,
            connections: result.connections,
        })
        .into_response())
    }
}

/// Turn a selected connection into an appointment draft.
async fn create_appointment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: AppointmentRequest = parse_body(&body)?;

    let connection = parse_connection(&req.connection).ok_or_else(|| AppError::BadRequest {
        message: "connection must be a JSON object".to_string(),
    })?;

    let locale = req
        .locale
        .as_deref()
        .map_or(state.locale, Locale::detect);

    let draft = create_transfer_appointment(
        &connection,
        &req.context,
        &locale.labels(),
        state.calendar.as_deref(),
    )?;

    Ok(Json(draft).into_response())
}

/// Favourite stops with their walking times.
async fn favourites(State(state): State<AppState>) -> Json<Vec<FavouriteStop>> {
    Json(state.favourites.stops().to_vec())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        match e {
            TimetableError::InvalidArgument(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            TimetableError::InvalidBaseUrl { .. } => AppError::Internal {
                message: e.to_string(),
            },
            TimetableError::Http { .. }
            | TimetableError::Transport(_)
            | TimetableError::Json { .. } => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::InvalidInput(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            AppointmentError::IntegrationUnavailable(_) => AppError::Unavailable {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, details) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "Bad request", message),
            AppError::Upstream { message } => {
                (StatusCode::BAD_GATEWAY, "Timetable query failed", message)
            }
            AppError::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Calendar integration unavailable",
                message,
            ),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", message)
            }
        };

        if status.is_server_error() {
            error!(%status, %details, "{title}");
        } else {
            warn!(%status, %details, "{title}");
        }

        let body = Json(ErrorResponse {
            error: title.to_string(),
            details: Some(details),
        });
        (status, body).into_response()
    }
}
