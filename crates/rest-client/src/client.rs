//! Retrying REST dispatcher around reqwest.

use crate::error::RestError;
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait suggested to the caller when a 429/418 carries no `Retry-After`.
const DEFAULT_RETRY_AFTER_MS: u64 = 60_000;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One fully prepared HTTP request.
///
/// `query` and `body` are already url-encoded; the dispatcher sends them
/// verbatim so that signatures computed over them stay valid.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    /// Form-encoded body, sent with `application/x-www-form-urlencoded`.
    pub body: Option<String>,
    pub headers: Vec<(&'static str, String)>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            headers: Vec::new(),
        }
    }
}

/// A 2xx response, body not yet decoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON into `T`.
    ///
    /// # Errors
    /// Returns `RestError::Decode` if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RestError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::warn!(
                body = %String::from_utf8_lossy(&self.body),
                error = %e,
                "Failed to decode response"
            );
            RestError::Decode(e.to_string())
        })
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// REST client with a bounded retry loop.
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RestClient {
    /// Create a new REST client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "https://api.binance.com")
    /// * `timeout` - Per-attempt request timeout
    /// * `retry` - Retry policy for transport failures and 5xx responses
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Create a new REST client with default timeout and retry policy.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT, RetryPolicy::default())
    }

    /// Same connection pool and policy, different host.
    pub fn with_base_url(&self, base_url: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: self.retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a request, retrying per policy.
    pub async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, RestError> {
        self.execute_with(|| request.clone()).await
    }

    /// Send a request built fresh for every attempt.
    ///
    /// `prepare` runs once per attempt, which lets signed requests carry a new
    /// timestamp on each retry. Transport errors and 5xx responses are retried
    /// up to `retries` times; everything else returns immediately. After the
    /// last attempt the last error is returned.
    pub async fn execute_with<F>(&self, mut prepare: F) -> Result<RawResponse, RestError>
    where
        F: FnMut() -> HttpRequest,
    {
        let mut backoff = self.retry.backoff.start();
        let mut attempt: u32 = 0;

        loop {
            let request = prepare();

            match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retry.retries => {
                    attempt += 1;
                    let delay = backoff.next_delay();
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt = attempt,
                        max_retries = self.retry.retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<RawResponse, RestError> {
        let url = self.build_url(&request.path, request.query.as_deref());
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.client.request(request.method.clone(), &url);

        for (key, value) in &request.headers {
            builder = builder.header(*key, value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        let response = builder.send().await?;
        Self::handle_response(response).await
    }

    /// Build a full URL from path and optional query string.
    fn build_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    async fn handle_response(response: Response) -> Result<RawResponse, RestError> {
        let status = response.status();
        let headers = response.headers().clone();

        if status.is_success() {
            let body = response.bytes().await?.to_vec();
            return Ok(RawResponse {
                status: status.as_u16(),
                headers,
                body,
            });
        }

        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 || status.as_u16() == 418 {
            let retry_after_ms = headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1_000))
                .unwrap_or(DEFAULT_RETRY_AFTER_MS);

            return Err(RestError::RateLimited {
                status: status.as_u16(),
                retry_after_ms,
            });
        }

        Err(RestError::HttpError {
            status: status.as_u16(),
            message: body,
        })
    }
}
