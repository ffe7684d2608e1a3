use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The API key is blank or contains characters not allowed in a header.
    #[error("Invalid API key format")]
    InvalidKeyFormat,

    /// An authenticated endpoint was called on a client built without credentials.
    #[error("Endpoint {endpoint} requires API credentials")]
    MissingCredentials {
        /// Path of the endpoint that was called.
        endpoint: String,
    },
}
