//! Public spot market data.

use crate::client::BinanceRestClient;
use crate::error::BinanceRestError;
use crate::request::{required, Params, Request};
use crate::response::ApiResponse;
use crate::responses::{DepthResponse, Kline, PingResponse, ServerTimeResponse};

/// Connectivity check.
pub struct PingService<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> PingService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> Result<ApiResponse<PingResponse>, BinanceRestError> {
        self.client.execute(Request::get("/api/v3/ping")).await
    }
}

/// Current server time.
pub struct ServerTimeService<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> ServerTimeService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> Result<ApiResponse<ServerTimeResponse>, BinanceRestError> {
        self.client.execute(Request::get("/api/v3/time")).await
    }
}

/// Order book snapshot.
pub struct DepthService<'a> {
    client: &'a BinanceRestClient,
    symbol: Option<String>,
    limit: Option<u32>,
}

impl<'a> DepthService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            symbol: None,
            limit: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Default 100, max 5000. Weight grows with the limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let mut params = Params::new();
        params
            .set("symbol", required(self.symbol.as_deref(), "symbol")?)
            .set_opt("limit", self.limit);

        Ok(Request::get("/api/v3/depth").params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<DepthResponse>, BinanceRestError> {
        let request = self.request()?;
        self.client.execute(request).await
    }
}

/// Spot kline/candlestick bars.
pub struct KlinesService<'a> {
    client: &'a BinanceRestClient,
    symbol: Option<String>,
    interval: Option<String>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    limit: Option<u32>,
}

impl<'a> KlinesService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            symbol: None,
            interval: None,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn start_time(mut self, start_time_ms: i64) -> Self {
        self.start_time = Some(start_time_ms);
        self
    }

    pub fn end_time(mut self, end_time_ms: i64) -> Self {
        self.end_time = Some(end_time_ms);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let mut params = Params::new();
        params
            .set("symbol", required(self.symbol.as_deref(), "symbol")?)
            .set("interval", required(self.interval.as_deref(), "interval")?)
            .set_opt("startTime", self.start_time)
            .set_opt("endTime", self.end_time)
            .set_opt("limit", self.limit);

        Ok(Request::get("/api/v3/klines").params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<Vec<Kline>>, BinanceRestError> {
        let request = self.request()?;
        self.client.execute(request).await
    }
}
