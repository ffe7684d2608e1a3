//! Binance REST API client.
//!
//! This crate provides typed builders for the Binance REST API with:
//!
//! - **Alpha market data**: klines, tickers and the token list from the `/bapi` host
//! - **Simple Earn**: flexible product list, positions, subscribe and redeem
//! - **Spot and margin**: market data, orders, listen keys, margin account queries
//! - **Signing**: HMAC-SHA256 over the exact encoded payload, re-signed per retry
//! - **Time synchronization**: Adjusts for clock skew between local and server time
//! - **Error handling**: Typed errors split into validation, transport, server and decode
//!
//! # Example
//!
//! ```rust,ignore
//! use binance_rest::{BinanceRestClient, ClientConfig};
//!
//! let client = BinanceRestClient::from_config(ClientConfig::from_env()?)?;
//!
//! let klines = client
//!     .alpha_klines()
//!     .symbol("ALPHA_175USDT")
//!     .interval("1h")
//!     .limit(24)
//!     .send()
//!     .await?
//!     .into_data();
//!
//! for kline in klines.klines()? {
//!     println!("{} close={}", kline.open_time, kline.close);
//! }
//! ```
//!
//! Dropping a `send` future cancels the call; wrap it in
//! `tokio::time::timeout` to impose a deadline.

mod client;
mod config;
mod enums;
mod error;
mod request;
mod response;
mod responses;
mod services;

#[cfg(test)]
mod testing;

pub use client::BinanceRestClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, MAX_RECV_WINDOW_MS};
pub use enums::{NewOrderRespType, OrderSide, OrderType, TimeInForce};
pub use error::BinanceRestError;
pub use request::{Host, Params, Request, SecurityType};
pub use response::{ApiResponse, RateLimit, RateLimitInterval, RateLimitType};
pub use responses::{
    DepthResponse, Kline, ListenKeyResponse, NewOrderResponse, OrderFill, OrderResponse,
    PingResponse, PriceLevel, ServerTimeResponse,
};
pub use services::*;

pub use auth::{ApiCredentials, AuthError};
pub use common::BinanceEnvironment;
pub use rest_client::{RestError, RetryPolicy};
