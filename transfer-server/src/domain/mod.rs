//! Domain types for the transfer planner.
//!
//! This module contains the normalised connection model. Everything here is
//! built from already-parsed values: the upstream JSON and its naming quirks
//! are handled in [`crate::timetable`] and never reach these types.

mod connection;
pub mod emoji;
mod leg;
mod response;
mod time;

pub use connection::{Connection, DIRECT};
pub use leg::{Exit, Leg};
pub use response::ConnectionsResponse;
pub use time::{
    TimeValue, format_date_for_query, format_duration, format_time_of_day, parse_api_datetime,
    round_minutes,
};
