//! Binance REST API client.

use crate::config::ClientConfig;
use crate::error::BinanceRestError;
use crate::request::{Host, Request, SecurityType};
use crate::response::{ApiResponse, RateLimit};
use crate::services::{
    AlphaKlinesService, AlphaTickerService, AlphaTokensService, CancelOrderService,
    DepthService, FlexiblePositionService, KlinesService, MarginAccountService,
    MarginMaxBorrowableService, NewOrderService, PingService, QueryOrderService,
    RedeemFlexibleService, ServerTimeService, SimpleEarnFlexibleProductListService,
    SubscribeFlexibleService,
};
use auth::{ApiCredentials, AuthError, RequestSigner};
use common::BinanceEnvironment;
use rest_client::{HttpRequest, RestClient};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance REST API client.
///
/// Holds read-only configuration and is safe to share between tasks behind
/// an `Arc`. Each endpoint is reached through a builder returned by one of
/// the service constructors, e.g. [`BinanceRestClient::alpha_klines`].
pub struct BinanceRestClient {
    rest: RestClient,
    alpha: RestClient,
    credentials: Option<ApiCredentials>,
    environment: BinanceEnvironment,
    recv_window: Option<u64>,
    /// Time offset between local clock and Binance server (local - server).
    time_offset_ms: AtomicI64,
}

impl BinanceRestClient {
    /// Production client with credentials and default settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials) -> Result<Self, BinanceRestError> {
        Self::from_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Production client for public endpoints only.
    pub fn public() -> Result<Self, BinanceRestError> {
        Self::from_config(ClientConfig::default())
    }

    /// Client with credentials for a specific environment.
    pub fn with_environment(
        credentials: ApiCredentials,
        environment: BinanceEnvironment,
    ) -> Result<Self, BinanceRestError> {
        Self::from_config(ClientConfig::new(environment).with_credentials(credentials))
    }

    /// Build a client from explicit configuration.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for out-of-range settings, or a REST error if
    /// the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, BinanceRestError> {
        config.validate()?;

        let rest = RestClient::new(config.rest_base_url(), config.timeout, config.retry)?;
        let alpha = rest.with_base_url(config.alpha_base_url());

        tracing::debug!(
            environment = %config.environment,
            rest_base_url = %rest.base_url(),
            alpha_base_url = %alpha.base_url(),
            retries = config.retry.retries,
            authenticated = config.credentials.is_some(),
            "Binance REST client created"
        );

        Ok(Self {
            rest,
            alpha,
            credentials: config.credentials,
            environment: config.environment,
            recv_window: config.recv_window,
            time_offset_ms: AtomicI64::new(0),
        })
    }

    pub fn environment(&self) -> BinanceEnvironment {
        self.environment
    }

    /// The API key, if the client has credentials (safe to log).
    pub fn api_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(ApiCredentials::api_key)
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Current local-clock offset from the server, in milliseconds.
    pub fn time_offset_ms(&self) -> i64 {
        self.time_offset_ms.load(Ordering::Relaxed)
    }

    /// Estimated current Binance server time.
    ///
    /// Local clock corrected by the offset measured in [`Self::sync_time`].
    pub fn server_timestamp_ms(&self) -> i64 {
        local_time_ms() - self.time_offset_ms.load(Ordering::Relaxed)
    }

    // ========================================================================
    // Time Synchronization
    // ========================================================================

    /// Synchronize with Binance server time.
    ///
    /// Measures the offset between the local clock and the server clock and
    /// applies it to every signed request's `timestamp`. Call on startup and
    /// again if requests are rejected with -1021.
    pub async fn sync_time(&self) -> Result<i64, BinanceRestError> {
        let before = Instant::now();
        let response = self.server_time().send().await?;
        let rtt = before.elapsed().as_millis() as i64;

        let local_time = local_time_ms();

        // Estimate server time at midpoint of request
        let estimated_server_time = response.data.server_time + (rtt / 2);
        let offset = local_time - estimated_server_time;

        self.time_offset_ms.store(offset, Ordering::Relaxed);

        tracing::info!(
            server_time = response.data.server_time,
            local_time = local_time,
            offset_ms = offset,
            rtt_ms = rtt,
            "Time synchronized with Binance server"
        );

        Ok(offset)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send a request and decode its body as `T`.
    ///
    /// Credentials are checked before any I/O. Signed requests are re-signed
    /// with a fresh timestamp on every attempt.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<ApiResponse<T>, BinanceRestError> {
        let credentials = if request.security.requires_credentials() {
            Some(self.credentials.as_ref().ok_or_else(|| {
                AuthError::MissingCredentials {
                    endpoint: request.path.to_string(),
                }
            })?)
        } else {
            None
        };

        if request.host == Host::Api
            && request.path.starts_with("/sapi")
            && !self.environment.supports_sapi()
        {
            tracing::warn!(
                path = request.path,
                environment = %self.environment,
                "Endpoint is not served by this environment"
            );
        }

        let encoded = request.params.encode()?;
        let http = match request.host {
            Host::Api => &self.rest,
            Host::Alpha => &self.alpha,
        };

        let raw = http
            .execute_with(|| self.prepare(&request, &encoded, credentials))
            .await
            .map_err(BinanceRestError::from_rest)?;

        let data = raw.decode::<T>()?;
        let rate_limits = RateLimit::from_response(&raw);

        tracing::debug!(
            path = request.path,
            status = raw.status,
            rate_limits = rate_limits.len(),
            "Response decoded"
        );

        Ok(ApiResponse {
            data,
            status: raw.status,
            rate_limits,
        })
    }

    /// Turn a request into wire form for one attempt.
    fn prepare(
        &self,
        request: &Request,
        encoded: &str,
        credentials: Option<&ApiCredentials>,
    ) -> HttpRequest {
        let mut http = HttpRequest::new(request.method.clone(), request.path);
        let mut payload = encoded.to_string();

        if let Some(credentials) = credentials {
            http.headers
                .push((API_KEY_HEADER, credentials.api_key().to_string()));

            if request.security == SecurityType::Signed {
                if let Some(window) = self.recv_window {
                    append_pair(&mut payload, "recvWindow", window);
                }
                append_pair(&mut payload, "timestamp", self.server_timestamp_ms());
                payload = RequestSigner::new(credentials).sign_encoded(&payload);
            }
        }

        if !payload.is_empty() {
            if request.uses_body() {
                http.body = Some(payload);
            } else {
                http.query = Some(payload);
            }
        }

        http
    }

    // ========================================================================
    // Alpha
    // ========================================================================

    /// GET /bapi/defi/v1/public/alpha-trade/klines
    pub fn alpha_klines(&self) -> AlphaKlinesService<'_> {
        AlphaKlinesService::new(self)
    }

    /// GET /bapi/defi/v1/public/alpha-trade/ticker
    pub fn alpha_ticker(&self) -> AlphaTickerService<'_> {
        AlphaTickerService::new(self)
    }

    /// GET /bapi/defi/v1/public/wallet-direct/buw/wallet/cex/alpha/all/token/list
    pub fn alpha_tokens(&self) -> AlphaTokensService<'_> {
        AlphaTokensService::new(self)
    }

    // ========================================================================
    // Simple Earn
    // ========================================================================

    /// GET /sapi/v1/simple-earn/flexible/list
    pub fn simple_earn_flexible_product_list(&self) -> SimpleEarnFlexibleProductListService<'_> {
        SimpleEarnFlexibleProductListService::new(self)
    }

    /// GET /sapi/v1/simple-earn/flexible/position
    pub fn flexible_position(&self) -> FlexiblePositionService<'_> {
        FlexiblePositionService::new(self)
    }

    /// POST /sapi/v1/simple-earn/flexible/subscribe
    pub fn subscribe_flexible(&self) -> SubscribeFlexibleService<'_> {
        SubscribeFlexibleService::new(self)
    }

    /// POST /sapi/v1/simple-earn/flexible/redeem
    pub fn redeem_flexible(&self) -> RedeemFlexibleService<'_> {
        RedeemFlexibleService::new(self)
    }

    // ========================================================================
    // Spot Market Data
    // ========================================================================

    /// GET /api/v3/ping
    pub fn ping(&self) -> PingService<'_> {
        PingService::new(self)
    }

    /// GET /api/v3/time
    pub fn server_time(&self) -> ServerTimeService<'_> {
        ServerTimeService::new(self)
    }

    /// GET /api/v3/depth
    pub fn depth(&self) -> DepthService<'_> {
        DepthService::new(self)
    }

    /// GET /api/v3/klines
    pub fn klines(&self) -> KlinesService<'_> {
        KlinesService::new(self)
    }

    // ========================================================================
    // Spot Orders
    // ========================================================================

    /// POST /api/v3/order
    pub fn new_order(&self) -> NewOrderService<'_> {
        NewOrderService::new(self)
    }

    /// GET /api/v3/order
    pub fn query_order(&self) -> QueryOrderService<'_> {
        QueryOrderService::new(self)
    }

    /// DELETE /api/v3/order
    pub fn cancel_order(&self) -> CancelOrderService<'_> {
        CancelOrderService::new(self)
    }

    // ========================================================================
    // Margin
    // ========================================================================

    /// GET /sapi/v1/margin/account
    pub fn margin_account(&self) -> MarginAccountService<'_> {
        MarginAccountService::new(self)
    }

    /// GET /sapi/v1/margin/maxBorrowable
    pub fn margin_max_borrowable(&self) -> MarginMaxBorrowableService<'_> {
        MarginMaxBorrowableService::new(self)
    }
}

impl std::fmt::Debug for BinanceRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceRestClient")
            .field("environment", &self.environment)
            .field("base_url", &self.rest.base_url())
            .field("alpha_base_url", &self.alpha.base_url())
            .field("api_key", &self.api_key())
            .field("recv_window", &self.recv_window)
            .field("time_offset_ms", &self.time_offset_ms())
            .finish()
    }
}

fn append_pair(payload: &mut String, name: &str, value: impl std::fmt::Display) {
    if !payload.is_empty() {
        payload.push('&');
    }
    payload.push_str(&format!("{name}={value}"));
}

fn local_time_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
