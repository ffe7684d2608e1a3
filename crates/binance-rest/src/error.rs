//! Binance REST API error types.

use auth::AuthError;
use rest_client::RestError;
use thiserror::Error;

/// Errors that can occur when interacting with the Binance REST API.
#[derive(Debug, Error)]
pub enum BinanceRestError {
    /// A required parameter was not set on the builder. No request was sent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter or configuration value is out of range. No request was sent.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Transport, HTTP status or decode failure.
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),

    /// Missing or malformed credentials.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Binance error document (`{"code": -1121, "msg": "..."}`) on a non-2xx response.
    #[error("Binance API error {code} (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Binance error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// Alpha envelope whose `code` is not `000000`, surfaced by `into_data`.
    #[error("Binance envelope error {code}: {message}")]
    Envelope {
        /// Envelope code, e.g. `400001`.
        code: String,
        /// `message`, or `messageDetail` if that is all there is.
        message: String,
    },

    /// Order not found.
    #[error("Order not found")]
    OrderNotFound,

    /// Insufficient balance for the order.
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Listen key has expired or is invalid.
    #[error("Listen key expired or invalid")]
    ListenKeyExpired,
}

impl BinanceRestError {
    /// Lift a dispatcher error, parsing Binance error bodies on non-2xx responses.
    pub fn from_rest(err: RestError) -> Self {
        match err {
            RestError::HttpError { status, message } => {
                Self::from_api_response(status, &message).unwrap_or(Self::Rest(
                    RestError::HttpError { status, message },
                ))
            }
            other => Self::Rest(other),
        }
    }

    /// Parse a Binance API error body.
    ///
    /// Binance returns errors in the format: `{"code": -1000, "msg": "..."}`.
    /// Returns `None` if the body is something else (HTML from a proxy, etc.).
    pub fn from_api_response(status: u16, body: &str) -> Option<Self> {
        #[derive(serde::Deserialize)]
        struct ApiError {
            code: i64,
            msg: String,
        }

        serde_json::from_str::<ApiError>(body)
            .ok()
            .map(|err| Self::classify_api_error(status, err.code, err.msg))
    }

    /// Classify a Binance API error code into a more specific error.
    fn classify_api_error(status: u16, code: i64, message: String) -> Self {
        match code {
            -1125 => Self::ListenKeyExpired,
            -2010 if message.to_lowercase().contains("insufficient balance") => {
                Self::InsufficientBalance
            }
            -2011 | -2013 => Self::OrderNotFound,
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }

    /// Caught before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidParameter(_) | Self::Auth(_)
        )
    }

    /// The request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Rest(err) if err.is_transport())
    }

    /// The server answered with a non-2xx status.
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Rest(err) => err.status().is_some(),
            Self::Api { .. }
            | Self::OrderNotFound
            | Self::InsufficientBalance
            | Self::ListenKeyExpired => true,
            _ => false,
        }
    }

    /// A 2xx body did not match the expected JSON shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Rest(err) if err.is_decode())
    }

    /// HTTP status of the failed response, when one was received and kept.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rest(err) => err.status(),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error indicates the operation could succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rest(rest_err) => rest_err.is_retryable() || rest_err.is_rate_limited(),
            // Unknown/disconnected/too-many-requests/timestamp-drift codes
            Self::Api { code, .. } => matches!(code, -1000 | -1001 | -1003 | -1007 | -1021),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rest_parses_binance_error_body() {
        let err = BinanceRestError::from_rest(RestError::HttpError {
            status: 400,
            message: r#"{"code":-1121,"msg":"Invalid symbol."}"#.into(),
        });

        match err {
            BinanceRestError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, -1121);
                assert_eq!(message, "Invalid symbol.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_rest_keeps_non_json_body() {
        let err = BinanceRestError::from_rest(RestError::HttpError {
            status: 502,
            message: "<html>bad gateway</html>".into(),
        });

        assert!(matches!(
            err,
            BinanceRestError::Rest(RestError::HttpError { status: 502, .. })
        ));
        assert!(err.is_server_error());
        assert!(!err.is_decode());
    }

    #[test]
    fn test_classify_known_codes() {
        assert!(matches!(
            BinanceRestError::from_api_response(400, r#"{"code":-2013,"msg":"Order does not exist."}"#),
            Some(BinanceRestError::OrderNotFound)
        ));
        assert!(matches!(
            BinanceRestError::from_api_response(400, r#"{"code":-1125,"msg":"This listenKey does not exist."}"#),
            Some(BinanceRestError::ListenKeyExpired)
        ));
        assert!(matches!(
            BinanceRestError::from_api_response(
                400,
                r#"{"code":-2010,"msg":"Account has insufficient balance for requested action."}"#
            ),
            Some(BinanceRestError::InsufficientBalance)
        ));
        assert!(matches!(
            BinanceRestError::from_api_response(400, r#"{"code":-2010,"msg":"Duplicate order sent."}"#),
            Some(BinanceRestError::Api { code: -2010, .. })
        ));
    }

    #[test]
    fn test_taxonomy_is_disjoint() {
        let validation = BinanceRestError::MissingParameter("symbol");
        let transport = BinanceRestError::Rest(RestError::Timeout);
        let decode = BinanceRestError::Rest(RestError::Decode("eof".into()));
        let server = BinanceRestError::Rest(RestError::HttpError {
            status: 500,
            message: String::new(),
        });

        assert!(validation.is_validation() && !validation.is_server_error());
        assert!(transport.is_transport() && !transport.is_server_error());
        assert!(decode.is_decode() && !decode.is_server_error());
        assert!(server.is_server_error() && !server.is_decode());
        assert_eq!(server.status(), Some(500));
    }
}
