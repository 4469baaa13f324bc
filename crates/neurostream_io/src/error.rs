//! Error types for neurostream_io crate.
//!
//! Provides structured error handling for stream transport, payload decoding
//! and session lifecycle.

use thiserror::Error;

/// Main error type for neurostream_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Malformed stream payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the producer
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session was closed or failed terminally and cannot be reopened
    #[error("Stream session is closed")]
    SessionClosed,

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for neurostream_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new parse error.
    #[must_use]
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a new network error.
    #[must_use]
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::parse("not an array");
        assert_eq!(err.to_string(), "Parse error: not an array");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::network("reset by peer").with_context("reading brain stream");
        assert!(err.to_string().contains("reading brain stream"));
        assert!(err.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_status_display() {
        let err = IoError::HttpStatus {
            status: 404,
            url: "http://x/pets/1/brain/stream".to_string(),
        };
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: IoError = json_err.into();
        assert!(matches!(err, IoError::Json(_)));
    }
}
