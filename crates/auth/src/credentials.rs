//! API credential management.
//!
//! The secret is held in a `SecretString` so it never shows up in logs and is
//! zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

const API_KEY_VAR: &str = "BINANCE_API_KEY";
const SECRET_KEY_VAR: &str = "BINANCE_SECRET_KEY";

/// API key plus HMAC secret for authenticated requests.
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    secret_key: SecretString,
}

impl ApiCredentials {
    /// Load credentials from `BINANCE_API_KEY` / `BINANCE_SECRET_KEY`.
    ///
    /// A `.env` file is loaded first if present.
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set, and
    /// `AuthError::InvalidKeyFormat` if the API key is blank.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| AuthError::MissingEnvVar(API_KEY_VAR.into()))?;

        let secret_key = std::env::var(SECRET_KEY_VAR)
            .map_err(|_| AuthError::MissingEnvVar(SECRET_KEY_VAR.into()))?;

        Self::try_new(api_key, secret_key)
    }

    /// Like [`ApiCredentials::from_env`], but `Ok(None)` when neither variable is set.
    ///
    /// Public-only clients run without credentials; a half-configured pair is
    /// still an error.
    pub fn from_env_optional() -> Result<Option<Self>, AuthError> {
        dotenvy::dotenv().ok();
        Self::from_optional_pair(std::env::var(API_KEY_VAR).ok(), std::env::var(SECRET_KEY_VAR).ok())
    }

    /// Build from values that may each be missing: both absent is `None`,
    /// exactly one absent is `MissingEnvVar` naming the absent variable.
    pub fn from_optional_pair(
        api_key: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Option<Self>, AuthError> {
        match (api_key, secret_key) {
            (None, None) => Ok(None),
            (Some(key), Some(secret)) => Self::try_new(key, secret).map(Some),
            (None, Some(_)) => Err(AuthError::MissingEnvVar(API_KEY_VAR.into())),
            (Some(_), None) => Err(AuthError::MissingEnvVar(SECRET_KEY_VAR.into())),
        }
    }

    /// Create credentials from explicit values.
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: SecretString::from(secret_key),
        }
    }

    /// Create credentials, rejecting a blank API key.
    ///
    /// Header values with surrounding whitespace are rejected by Binance, so
    /// the key is trimmed.
    pub fn try_new(api_key: String, secret_key: String) -> Result<Self, AuthError> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() || api_key.chars().any(char::is_control) {
            return Err(AuthError::InvalidKeyFormat);
        }
        Ok(Self::new(api_key, secret_key))
    }

    /// The public API key, sent as `X-MBX-APIKEY`.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret key for signing.
    ///
    /// Only for HMAC computation. Never log the return value.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
