//! Appointment error types.

/// Errors from appointment translation or hand-off.
#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    /// The connection cannot be turned into an appointment
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The calendar could not take the draft
    #[error("calendar integration unavailable: {0}")]
    IntegrationUnavailable(String),
}
