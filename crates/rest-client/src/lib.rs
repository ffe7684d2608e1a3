//! Generic REST dispatch over `reqwest`.
//!
//! - Consistent error handling via `RestError` (transport, HTTP status, decode)
//! - Bounded retries with backoff for transport failures and 5xx responses
//! - Raw responses with headers, decoded into JSON types on demand
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::{HttpRequest, Method, RestClient};
//!
//! let client = RestClient::with_default_timeout("https://api.binance.com")?;
//! let raw = client.execute(&HttpRequest::new(Method::GET, "/api/v3/time")).await?;
//! let time: serde_json::Value = raw.decode()?;
//! ```

mod client;
mod error;
mod retry;

pub use client::{HttpRequest, RawResponse, RestClient};
pub use error::RestError;
pub use retry::RetryPolicy;

pub use reqwest::Method;
