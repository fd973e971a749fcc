//! Remote source error types

use std::time::Duration;

/// Errors that can occur while fetching a page from the remote source.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP response.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body was not a list of rows.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// The table never retries on its own; this is a hint for the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::http(503, "unavailable").is_retryable());
        assert!(ApiError::http(429, "slow down").is_retryable());
        assert!(!ApiError::http(404, "missing").is_retryable());
        assert!(!ApiError::parse("not a list").is_retryable());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(ApiError::http(500, "boom").status_code(), Some(500));
        assert_eq!(ApiError::InvalidUrl("x".into()).status_code(), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::UnknownColumn("price".into()).is_programming_error());
        assert!(Error::UnsupportedSortType("date".into()).is_programming_error());
        assert!(!Error::from(ApiError::http(500, "boom")).is_programming_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::http(404, "Not Found").to_string(),
            "HTTP 404: Not Found"
        );
        assert_eq!(
            Error::UnknownColumn("price".into()).to_string(),
            "Unknown column: price"
        );
    }
}
