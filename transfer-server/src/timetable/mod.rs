//! Timetable route-query client.
//!
//! This module talks to the journey-planning API's route endpoint and turns
//! its JSON into the [`crate::domain`] connection model.
//!
//! Key characteristics of the API:
//! - Times are `"yyyy-MM-dd HH:mm:ss"` strings in local time
//! - Field names appear in lower-camel (`type_name`) or upper-camel
//!   (`TypeName`) form; both are accepted for every field
//! - Arrival-time queries ask for `pre` connections before the anchor,
//!   departure-time queries for `num` connections after it

mod client;
mod convert;
mod error;
mod payload;
mod request;

pub use client::{DEFAULT_BASE_URL, TimetableClient, TimetableConfig};
pub use convert::{parse_connection, parse_connections_response};
pub use error::TimetableError;
pub use request::{ConnectionsRequest, DEFAULT_LIMIT};
