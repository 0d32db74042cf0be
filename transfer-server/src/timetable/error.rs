//! Timetable client error types.

/// Errors from building or executing a route query.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// A required query field is missing; no request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The configured base URL cannot be used.
    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The API answered with a non-success status.
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not valid JSON.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TimetableError::InvalidArgument("from is required");
        assert_eq!(err.to_string(), "invalid argument: from is required");

        let err = TimetableError::Http {
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");

        let err = TimetableError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("expected value"));
    }
}
