//! Connection to appointment translation.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::Connection;
use crate::domain::emoji::walk_token;

use super::context::TransferContext;
use super::error::AppointmentError;
use super::labels::Labels;

/// A new appointment, ready for the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub subject: String,
    pub location: String,
    pub body: String,
}

/// Build the appointment for a selected connection.
///
/// The appointment covers the walk to the first stop, the ride, and the walk
/// from the last stop. Fails with [`AppointmentError::InvalidInput`] if the
/// connection lacks a departure or arrival time.
pub fn translate(
    connection: &Connection,
    context: &TransferContext,
    labels: &Labels,
) -> Result<AppointmentDraft, AppointmentError> {
    let (Some(departure), Some(arrival)) = (connection.departure, connection.arrival) else {
        return Err(AppointmentError::InvalidInput(
            "connection has no valid departure/arrival times".to_string(),
        ));
    };

    let (start_walk, end_walk) = context.walk_minutes();

    let from = non_empty_or(&connection.from, &context.from);
    let to = non_empty_or(&connection.to, &context.to);

    let subject = format!("{} {from}–{to}", labels.transfer_prefix);

    let mut location = String::new();
    if start_walk > 0 {
        location.push_str(&walk_token(start_walk));
    }
    location.push_str(&connection.to_emoji_route_chain());
    if end_walk > 0 {
        location.push_str(&walk_token(end_walk));
    }
    if location.is_empty() {
        location = labels.public_transport.to_string();
    }

    let mut body = Vec::with_capacity(3);
    if start_walk > 0 {
        body.push(format!("({})", walk_token(start_walk)));
    }
    let summary = connection.to_emoji_summary();
    if summary.is_empty() {
        body.push(format!("{from} → {to}"));
    } else {
        body.push(summary);
    }
    if end_walk > 0 {
        body.push(format!("({})", walk_token(end_walk)));
    }

    let start = Duration::try_minutes(start_walk)
        .and_then(|walk| departure.checked_sub_signed(walk))
        .ok_or_else(|| out_of_range("walk before departure", start_walk))?;
    let end = Duration::try_minutes(end_walk)
        .and_then(|walk| arrival.checked_add_signed(walk))
        .ok_or_else(|| out_of_range("walk after arrival", end_walk))?;

    Ok(AppointmentDraft {
        start,
        end,
        subject,
        location,
        body: body.join(" · "),
    })
}

fn out_of_range(what: &str, minutes: i64) -> AppointmentError {
    AppointmentError::InvalidInput(format!("{what} of {minutes} minutes is out of range"))
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
