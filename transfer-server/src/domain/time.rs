//! Date and time handling for the timetable API.
//!
//! The journey API exchanges timestamps as `"yyyy-MM-dd HH:mm:ss"` strings in
//! local wall-clock time. This module converts those strings to
//! [`NaiveDateTime`] values and formats them back for queries and display.
//!
//! None of these functions fail: unusable input yields `None` or an empty
//! string, and callers treat that as "unknown time".

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Fallback formats tried when the input is not in the API's own layout.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A time as handed to the formatting helpers: already parsed, or still text.
///
/// # Examples
///
/// ```
/// use transfer_server::domain::{TimeValue, format_time_of_day};
///
/// assert_eq!(format_time_of_day("2024-03-15 08:05:00"), "08:05");
/// assert_eq!(format_time_of_day(TimeValue::Missing), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue<'a> {
    /// A structured value; passed through unchanged.
    At(NaiveDateTime),
    /// A string to be parsed.
    Text(&'a str),
    /// No value at all.
    Missing,
}

impl From<NaiveDateTime> for TimeValue<'_> {
    fn from(value: NaiveDateTime) -> Self {
        TimeValue::At(value)
    }
}

impl From<&NaiveDateTime> for TimeValue<'_> {
    fn from(value: &NaiveDateTime) -> Self {
        TimeValue::At(*value)
    }
}

impl From<Option<NaiveDateTime>> for TimeValue<'_> {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(TimeValue::Missing, TimeValue::At)
    }
}

impl<'a> From<&'a str> for TimeValue<'a> {
    fn from(value: &'a str) -> Self {
        TimeValue::Text(value)
    }
}

impl<'a> From<&'a String> for TimeValue<'a> {
    fn from(value: &'a String) -> Self {
        TimeValue::Text(value.as_str())
    }
}

/// Parse an API timestamp.
///
/// Structured values pass straight through. Strings are first read as
/// `"yyyy-MM-dd HH:mm:ss"`: missing, empty or zero month/day components
/// default to 1, missing or non-numeric clock components default to 0. If
/// that layout does not apply, a few ISO 8601 variants are tried.
///
/// # Examples
///
/// ```
/// use transfer_server::domain::parse_api_datetime;
///
/// let t = parse_api_datetime("2024-03-15 08:05:00").unwrap();
/// assert_eq!(t.to_string(), "2024-03-15 08:05:00");
///
/// // Seconds may be omitted
/// assert!(parse_api_datetime("2024-03-15 08:05").is_some());
///
/// assert!(parse_api_datetime("").is_none());
/// assert!(parse_api_datetime("not a time").is_none());
/// ```
pub fn parse_api_datetime<'a>(value: impl Into<TimeValue<'a>>) -> Option<NaiveDateTime> {
    match value.into() {
        TimeValue::At(at) => Some(at),
        TimeValue::Text(text) => parse_text(text),
        TimeValue::Missing => None,
    }
}

/// Format the calendar date as `dd.MM.yyyy`, the layout the route query expects.
///
/// Returns an empty string if there is no usable date.
pub fn format_date_for_query<'a>(value: impl Into<TimeValue<'a>>) -> String {
    parse_api_datetime(value)
        .map(|at| at.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}

/// Format the time of day as `HH:mm`.
///
/// Returns an empty string if there is no usable time.
pub fn format_time_of_day<'a>(value: impl Into<TimeValue<'a>>) -> String {
    parse_api_datetime(value)
        .map(|at| at.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Render the interval between two times compactly, e.g. `"2h 28’"` or `"28’"`.
///
/// Minutes are rounded to the nearest whole minute. Missing times and
/// non-positive intervals render as an empty string.
pub fn format_duration(departure: Option<NaiveDateTime>, arrival: Option<NaiveDateTime>) -> String {
    let (Some(departure), Some(arrival)) = (departure, arrival) else {
        return String::new();
    };

    let secs = arrival.signed_duration_since(departure).num_seconds();
    if secs <= 0 {
        return String::new();
    }

    let total_minutes = round_minutes(secs);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || hours == 0 {
        parts.push(format!("{minutes}’"));
    }
    parts.join(" ")
}

/// Convert seconds to minutes, rounding half up. Saturates at the extremes.
pub fn round_minutes(secs: i64) -> i64 {
    secs.saturating_add(30).div_euclid(60)
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_api_layout(text).or_else(|| parse_fallback(text))
}

/// `"yyyy-MM-dd HH:mm:ss"`, tolerant of missing components.
fn parse_api_layout(text: &str) -> Option<NaiveDateTime> {
    let mut parts = text.split(' ');
    let (Some(date_part), Some(time_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let mut date_fields = date_part.split('-');
    let year: i32 = date_fields.next()?.parse().ok()?;
    let month = calendar_component(date_fields.next())?;
    let day = calendar_component(date_fields.next())?;

    let mut time_fields = time_part.split(':');
    let hour = clock_component(time_fields.next());
    let minute = clock_component(time_fields.next());
    let second = clock_component(time_fields.next());

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(date.and_time(time))
}

/// Month or day: absent, empty and zero all mean 1; anything non-numeric rejects.
fn calendar_component(field: Option<&str>) -> Option<u32> {
    match field {
        None | Some("") => Some(1),
        Some(field) => field.parse::<u32>().ok().map(|n| n.max(1)),
    }
}

fn clock_component(field: Option<&str>) -> u32 {
    field.and_then(|f| f.parse().ok()).unwrap_or(0)
}

fn parse_fallback(text: &str) -> Option<NaiveDateTime> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Local).naive_local());
    }

    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
