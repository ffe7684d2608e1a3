//! Client configuration.

use crate::error::BinanceRestError;
use auth::ApiCredentials;
use common::{BackoffPolicy, BinanceEnvironment};
use rest_client::RetryPolicy;
use std::time::Duration;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest `recvWindow` Binance accepts, in milliseconds.
pub const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Process-wide settings for a [`crate::BinanceRestClient`].
///
/// Read-only once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: BinanceEnvironment,
    /// Overrides the environment's spot host.
    pub base_url: Option<String>,
    /// Overrides the Alpha (`/bapi`) host.
    pub alpha_base_url: Option<String>,
    /// Needed only for API-key and signed endpoints.
    pub credentials: Option<ApiCredentials>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// `recvWindow` added to signed requests, in milliseconds.
    pub recv_window: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: BinanceEnvironment::default(),
            base_url: None,
            alpha_base_url: None,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            recv_window: None,
        }
    }
}

impl ClientConfig {
    pub fn new(environment: BinanceEnvironment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_alpha_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.alpha_base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window = Some(recv_window_ms);
        self
    }

    /// Spot host in effect.
    pub fn rest_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.rest_base_url())
    }

    /// Alpha host in effect.
    pub fn alpha_base_url(&self) -> &str {
        self.alpha_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.alpha_base_url())
    }

    /// Reject values Binance or the HTTP stack would refuse later.
    pub fn validate(&self) -> Result<(), BinanceRestError> {
        if let Some(window) = self.recv_window {
            if window == 0 || window > MAX_RECV_WINDOW_MS {
                return Err(BinanceRestError::InvalidParameter(format!(
                    "recvWindow must be in 1..={MAX_RECV_WINDOW_MS}, got {window}"
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(BinanceRestError::InvalidParameter(
                "timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from the process environment (and `.env`).
    ///
    /// Recognised variables:
    /// - `BINANCE_ENVIRONMENT` - `production` (default) or `testnet`
    /// - `BINANCE_BASE_URL`, `BINANCE_ALPHA_BASE_URL` - host overrides
    /// - `BINANCE_API_KEY`, `BINANCE_SECRET_KEY` - optional credentials
    /// - `BINANCE_RETRIES` - retry count
    /// - `BINANCE_BACKOFF_MS` - base delay between retries
    /// - `BINANCE_TIMEOUT_MS` - per-attempt timeout
    /// - `BINANCE_RECV_WINDOW` - `recvWindow` for signed requests
    pub fn from_env() -> Result<Self, BinanceRestError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BinanceRestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup("BINANCE_ENVIRONMENT") {
            config.environment = env
                .parse()
                .map_err(|e: common::ParseEnvironmentError| {
                    BinanceRestError::InvalidParameter(e.to_string())
                })?;
        }

        config.base_url = lookup("BINANCE_BASE_URL").filter(|v| !v.trim().is_empty());
        config.alpha_base_url = lookup("BINANCE_ALPHA_BASE_URL").filter(|v| !v.trim().is_empty());

        config.credentials = ApiCredentials::from_optional_pair(
            lookup("BINANCE_API_KEY"),
            lookup("BINANCE_SECRET_KEY"),
        )?;

        if let Some(retries) = parse_var::<u32>(&lookup, "BINANCE_RETRIES")? {
            config.retry.retries = retries;
        }
        if let Some(backoff_ms) = parse_var::<u64>(&lookup, "BINANCE_BACKOFF_MS")? {
            config.retry.backoff = BackoffPolicy {
                base: Duration::from_millis(backoff_ms),
                ..config.retry.backoff
            };
        }
        if let Some(timeout_ms) = parse_var::<u64>(&lookup, "BINANCE_TIMEOUT_MS")? {
            config.timeout = Duration::from_millis(timeout_ms);
        }
        config.recv_window = parse_var::<u64>(&lookup, "BINANCE_RECV_WINDOW")?;

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, BinanceRestError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| BinanceRestError::InvalidParameter(format!("{key}={raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::AuthError;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.rest_base_url(), "https://api.binance.com");
        assert_eq!(config.alpha_base_url(), "https://www.binance.com");
        assert_eq!(config.retry.retries, 3);
        assert!(config.credentials.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let config = ClientConfig::new(BinanceEnvironment::Testnet)
            .with_base_url("http://127.0.0.1:9000")
            .with_alpha_base_url("http://127.0.0.1:9001");

        assert_eq!(config.rest_base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.alpha_base_url(), "http://127.0.0.1:9001");
    }

    #[test]
    fn test_from_lookup_reads_everything() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BINANCE_ENVIRONMENT", "testnet"),
            ("BINANCE_API_KEY", "key"),
            ("BINANCE_SECRET_KEY", "secret"),
            ("BINANCE_RETRIES", "5"),
            ("BINANCE_BACKOFF_MS", "250"),
            ("BINANCE_TIMEOUT_MS", "1500"),
            ("BINANCE_RECV_WINDOW", "5000"),
        ]))
        .unwrap();

        assert_eq!(config.environment, BinanceEnvironment::Testnet);
        assert_eq!(config.rest_base_url(), "https://testnet.binance.vision");
        assert_eq!(config.credentials.unwrap().api_key(), "key");
        assert_eq!(config.retry.retries, 5);
        assert_eq!(config.retry.backoff.base, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.recv_window, Some(5000));
    }

    #[test]
    fn test_from_lookup_empty_is_public_default() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.credentials.is_none());
        assert_eq!(config.environment, BinanceEnvironment::Production);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[("BINANCE_RETRIES", "many")]))
            .unwrap_err();
        assert!(matches!(err, BinanceRestError::InvalidParameter(ref msg) if msg.contains("BINANCE_RETRIES")));

        let err = ClientConfig::from_lookup(lookup_from(&[("BINANCE_RECV_WINDOW", "90000")]))
            .unwrap_err();
        assert!(err.is_validation());

        let err = ClientConfig::from_lookup(lookup_from(&[("BINANCE_SECRET_KEY", "s")]))
            .unwrap_err();
        assert!(matches!(err, BinanceRestError::Auth(AuthError::MissingEnvVar(_))));
    }
}
