//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::appointment::{Direction, MeetingInfo, TransferContext, TransferPlan};
use crate::completion::CompletionOptions;
use crate::domain::{
    Connection, ConnectionsResponse, Exit, Leg, format_duration, format_time_of_day,
    parse_api_datetime,
};
use crate::favourites::FavouriteStops;
use crate::timetable::{ConnectionsRequest, TimetableError};

/// Query string for completion lookups.
///
/// Flags accept `1` or `true`; anything else, or absence, means off.
#[derive(Debug, Default, Deserialize)]
pub struct CompletionQuery {
    /// Text typed so far
    #[serde(default)]
    pub term: String,
    pub nofavorites: Option<String>,
    pub show_ids: Option<String>,
    pub show_coordinates: Option<String>,
}

impl CompletionQuery {
    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            nofavorites: flag(self.nofavorites.as_deref()),
            show_ids: flag(self.show_ids.as_deref()),
            show_coordinates: flag(self.show_coordinates.as_deref()),
        }
    }
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Request to search connections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsQuery {
    pub from: String,
    pub to: String,

    /// Intermediate stops, in order
    #[serde(default)]
    pub via: Vec<String>,

    /// Anchor time as `yyyy-MM-dd HH:mm:ss` or ISO 8601 (defaults to now)
    pub date_time: Option<String>,

    /// Whether `date_time` is the desired arrival
    #[serde(default)]
    pub is_arrival_time: bool,

    /// Number of connections (defaults to 4)
    pub limit: Option<u32>,
}

impl ConnectionsQuery {
    /// Validate and build the timetable request.
    pub fn to_request(&self) -> Result<ConnectionsRequest, TimetableError> {
        let mut request = ConnectionsRequest::new(self.from.as_str(), self.to.as_str())?
            .with_via(self.via.iter().cloned())
            .with_arrival_time(self.is_arrival_time);

        if let Some(text) = self.date_time.as_deref().filter(|t| !t.trim().is_empty()) {
            let at = parse_api_datetime(text)
                .ok_or(TimetableError::InvalidArgument("dateTime is not a valid date/time"))?;
            request = request.at(at);
        }
        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }
        Ok(request)
    }
}

/// Request to plan a trip to or from a meeting.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub direction: Direction,
    pub meeting: MeetingInfo,

    /// Stop nearest the meeting
    pub meeting_stop: String,

    /// The user's origin (inbound) or destination (outbound)
    pub endpoint_stop: String,

    /// Defaults to the favourite-stop walking time, then 0
    pub meeting_walk_minutes: Option<i64>,

    /// Defaults to the favourite-stop walking time, then 0
    pub endpoint_walk_minutes: Option<i64>,
}

impl TransferRequest {
    /// Build the plan, filling missing walks from the favourites.
    pub fn into_plan(self, favourites: &FavouriteStops) -> TransferPlan {
        let walk = |explicit: Option<i64>, stop: &str| {
            explicit
                .or_else(|| favourites.walk_minutes_for(stop).map(i64::from))
                .unwrap_or(0)
        };
        let meeting_walk = walk(self.meeting_walk_minutes, &self.meeting_stop);
        let endpoint_walk = walk(self.endpoint_walk_minutes, &self.endpoint_stop);

        TransferPlan::new(
            self.direction,
            self.meeting,
            self.meeting_stop,
            self.endpoint_stop,
        )
        .with_meeting_walk(meeting_walk)
        .with_endpoint_walk(endpoint_walk)
    }
}

/// Request to turn a selected connection into an appointment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    /// Connection as returned by this server or by the timetable API
    pub connection: Value,

    #[serde(default)]
    pub context: TransferContext,

    /// Host display language or locale tag; defaults to the server locale
    pub locale: Option<String>,
}

/// Response for a connection search.
#[derive(Debug, Serialize)]
pub struct ConnectionsResult {
    /// Count reported by the timetable
    pub count: i64,

    pub connections: Vec<ConnectionResult>,
}

impl ConnectionsResult {
    pub fn from_response(response: &ConnectionsResponse) -> Self {
        Self {
            count: response.count,
            connections: response
                .connections
                .iter()
                .map(ConnectionResult::from_connection)
                .collect(),
        }
    }
}

/// Response for a transfer search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Context to send back with the chosen connection
    pub context: TransferContext,

    /// Index of the preselected connection
    pub selected: Option<usize>,

    pub count: i64,

    pub connections: Vec<ConnectionResult>,
}

/// A connection with its derived views.
///
/// Uses upper-camel field names so it can be posted back as-is and read by
/// the same parser as timetable responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionResult {
    pub from: String,
    pub departure: Option<String>,
    pub to: String,
    pub arrival: Option<String>,

    /// Seconds, as reported by the timetable
    pub duration: i64,

    pub legs: Vec<LegResult>,

    /// Number of changes; absent for connections without a ride
    pub transfers: Option<u32>,

    pub via_string: String,
    pub emoji_summary: String,
    pub emoji_route_chain: String,

    /// `HH:mm`
    pub departure_time: String,

    /// `HH:mm`
    pub arrival_time: String,

    /// e.g. `"2h 28’"`
    pub duration_text: String,
}

impl ConnectionResult {
    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            from: connection.from.clone(),
            departure: api_datetime(connection.departure),
            to: connection.to.clone(),
            arrival: api_datetime(connection.arrival),
            duration: connection.duration(),
            legs: connection.legs.iter().map(LegResult::from_leg).collect(),
            transfers: connection.display_transfers(),
            via_string: connection.via_string(),
            emoji_summary: connection.to_emoji_summary(),
            emoji_route_chain: connection.to_emoji_route_chain(),
            departure_time: format_time_of_day(connection.departure),
            arrival_time: format_time_of_day(connection.arrival),
            duration_text: format_duration(connection.departure, connection.arrival),
        }
    }
}

/// A leg of a connection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegResult {
    pub name: String,
    pub departure: Option<String>,
    pub line: Option<String>,
    #[serde(rename = "Type")]
    pub kind: String,
    pub type_name: String,

    /// Seconds
    pub runningtime: i64,

    pub exit: Option<ExitResult>,
}

impl LegResult {
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            name: leg.name.clone(),
            departure: api_datetime(leg.departure),
            line: leg.line.clone(),
            kind: leg.kind.clone(),
            type_name: leg.type_name.clone(),
            runningtime: leg.running_secs,
            exit: leg.exit.as_ref().map(ExitResult::from_exit),
        }
    }
}

/// The arrival stop of a leg.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExitResult {
    pub name: String,
    pub arrival: Option<String>,
}

impl ExitResult {
    pub fn from_exit(exit: &Exit) -> Self {
        Self {
            name: exit.name.clone(),
            arrival: api_datetime(exit.arrival),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Timestamp in the timetable's own layout.
fn api_datetime(at: Option<NaiveDateTime>) -> Option<String> {
    at.map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
}
