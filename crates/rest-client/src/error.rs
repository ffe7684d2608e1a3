//! REST client error types.

use thiserror::Error;

/// Errors that can occur during REST API calls.
#[derive(Debug, Error)]
pub enum RestError {
    /// Non-2xx response with status code and body.
    #[error("HTTP error: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection error (network issue).
    #[error("Connection error: {0}")]
    Connection(String),

    /// 2xx response whose body did not match the expected JSON shape.
    #[error("JSON decode error: {0}")]
    Decode(String),

    /// Rate limited (429) or IP-banned (418) by the server.
    #[error("Rate limited ({status}), retry after {retry_after_ms}ms")]
    RateLimited {
        /// 429 or 418.
        status: u16,
        /// Suggested wait time before retrying.
        retry_after_ms: u64,
    },

    /// Failed to build the HTTP request.
    #[error("Request build error: {0}")]
    RequestBuild(String),
}

impl RestError {
    /// Transport failures and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            RestError::Timeout | RestError::Connection(_) => true,
            RestError::HttpError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, RestError::Timeout | RestError::Connection(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RestError::RateLimited { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RestError::Decode(_))
    }

    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::HttpError { status, .. } | RestError::RateLimited { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::Timeout
        } else if err.is_builder() {
            RestError::RequestBuild(err.to_string())
        } else if let Some(status) = err.status() {
            RestError::HttpError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            // connect, request and body-read failures alike
            RestError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RestError::Timeout.is_retryable());
        assert!(RestError::Connection("reset".into()).is_retryable());
        assert!(RestError::HttpError {
            status: 503,
            message: String::new()
        }
        .is_retryable());

        assert!(!RestError::HttpError {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!RestError::RateLimited {
            status: 429,
            retry_after_ms: 1_000
        }
        .is_retryable());
        assert!(!RestError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn test_status_only_for_responses() {
        assert_eq!(
            RestError::HttpError {
                status: 404,
                message: String::new()
            }
            .status(),
            Some(404)
        );
        assert_eq!(RestError::Timeout.status(), None);
        assert_eq!(RestError::Decode("x".into()).status(), None);
    }
}
