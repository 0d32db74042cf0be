//! Conversion from route-query JSON to domain types.
//!
//! Parsing is tolerant: missing or malformed fields fall back to empty
//! values instead of failing the whole response. Time strings that do not
//! parse become `None`.

use serde_json::Value;
use tracing::debug;

use crate::domain::{Connection, ConnectionsResponse, Exit, Leg, parse_api_datetime};

use super::payload::{
    ARRIVAL, CONNECTIONS, COUNT, DEPARTURE, DURATION, EXIT, FROM, Fields, LEGS, LINE, NAME,
    RUNNING_TIME, TO, TYPE, TYPE_NAME,
};

/// Convert a route-query body into a `ConnectionsResponse`.
///
/// A body that is not a JSON object yields an empty response. Array elements
/// that are not objects are skipped.
pub fn parse_connections_response(value: &Value) -> ConnectionsResponse {
    let Some(fields) = Fields::of(value) else {
        debug!("route response is not an object");
        return ConnectionsResponse::default();
    };

    let count = fields.number(COUNT).map_or(0, |n| n as i64);
    let connections = fields
        .array(CONNECTIONS)
        .iter()
        .filter_map(parse_connection)
        .collect();

    ConnectionsResponse { count, connections }
}

/// Convert one connection object, in either naming convention.
pub fn parse_connection(value: &Value) -> Option<Connection> {
    let fields = Fields::of(value)?;

    let legs = fields.array(LEGS).iter().filter_map(parse_leg).collect();

    let mut connection = Connection::new(
        fields.text(FROM).unwrap_or_default(),
        parse_time(&fields, DEPARTURE),
        fields.text(TO).unwrap_or_default(),
        parse_time(&fields, ARRIVAL),
        legs,
    );
    if let Some(secs) = fields.number(DURATION) {
        connection.set_duration(secs);
    }

    Some(connection)
}

fn parse_leg(value: &Value) -> Option<Leg> {
    let fields = Fields::of(value)?;

    let running_secs = fields
        .number(RUNNING_TIME)
        .filter(|secs| secs.is_finite())
        .map_or(0, |secs| secs.round() as i64);

    Some(Leg {
        name: fields.text(NAME).unwrap_or_default(),
        departure: parse_time(&fields, DEPARTURE),
        line: fields.text(LINE),
        kind: fields.text(TYPE).unwrap_or_default(),
        type_name: fields.text(TYPE_NAME).unwrap_or_default(),
        running_secs,
        exit: fields.object(EXIT).map(|exit| parse_exit(&exit)),
    })
}

fn parse_exit(fields: &Fields<'_>) -> Exit {
    Exit::new(
        fields.text(NAME).unwrap_or_default(),
        parse_time(fields, ARRIVAL),
    )
}

fn parse_time(fields: &Fields<'_>, aliases: &[&str]) -> Option<chrono::NaiveDateTime> {
    fields
        .text(aliases)
        .and_then(|text| parse_api_datetime(text.as_str()))
}
