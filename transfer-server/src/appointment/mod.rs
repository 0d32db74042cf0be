//! Turning a chosen connection into a calendar appointment.
//!
//! A [`TransferPlan`] describes one trip to or from a meeting: which stops,
//! how long the walks at either end take, and which timetable query to run.
//! Once the user picks a connection, [`translate`] computes the appointment
//! window, subject, location and body, and a [`CalendarIntegration`] opens it.

mod calendar;
mod context;
mod error;
mod labels;
mod translate;

pub use calendar::{CalendarIntegration, IcsOutbox, create_transfer_appointment};
pub use context::{Direction, MeetingInfo, TRANSFER_SEARCH_LIMIT, TransferContext, TransferPlan};
pub use error::AppointmentError;
pub use labels::{Labels, Locale};
pub use translate::{AppointmentDraft, translate};
