//! Alpha (Binance Web3 token market) endpoints.
//!
//! Served from the web host under `/bapi/defi`. Every payload is wrapped in
//! an [`AlphaResponse`] envelope whose `code` is `"000000"` on success.

use crate::client::BinanceRestClient;
use crate::error::BinanceRestError;
use crate::request::{required, Host, Params, Request};
use crate::response::ApiResponse;
use rest_client::RestError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

const KLINES_PATH: &str = "/bapi/defi/v1/public/alpha-trade/klines";
const TICKER_PATH: &str = "/bapi/defi/v1/public/alpha-trade/ticker";
const TOKENS_PATH: &str = "/bapi/defi/v1/public/wallet-direct/buw/wallet/cex/alpha/all/token/list";

/// Code the Alpha API uses for success.
pub const ALPHA_SUCCESS_CODE: &str = "000000";

/// Envelope around every Alpha payload.
///
/// Errors are reported inside the envelope with HTTP 200; `data` is then null.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaResponse<T> {
    pub code: String,
    pub message: Option<String>,
    pub message_detail: Option<String>,
    /// Absent on the token list endpoint.
    pub success: Option<bool>,
    pub data: Option<T>,
}

impl<T> AlphaResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == ALPHA_SUCCESS_CODE && self.success != Some(false)
    }

    /// Payload, or `BinanceRestError::Envelope` when the envelope reports failure.
    pub fn into_data(self) -> Result<T, BinanceRestError> {
        if self.is_success() {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }

        Err(BinanceRestError::Envelope {
            message: self
                .message
                .or(self.message_detail)
                .unwrap_or_else(|| "no data in response".to_string()),
            code: self.code,
        })
    }
}

/// One kline row, kept exactly as sent: twelve strings.
///
/// Index: 0 open time, 1 open, 2 high, 3 low, 4 close, 5 volume, 6 close time,
/// 7 quote volume, 8 trade count, 9 taker buy base volume, 10 taker buy quote
/// volume, 11 unused.
pub type AlphaKlineRow = Vec<String>;

pub type AlphaKlinesResponse = AlphaResponse<Vec<AlphaKlineRow>>;

/// Typed view of an [`AlphaKlineRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaKline {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: i64,
    pub quote_volume: Decimal,
    pub trades: u64,
    pub taker_buy_base_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
}

impl TryFrom<&[String]> for AlphaKline {
    type Error = BinanceRestError;

    fn try_from(row: &[String]) -> Result<Self, Self::Error> {
        if row.len() < 11 {
            return Err(RestError::Decode(format!(
                "kline row has {} fields, expected 12",
                row.len()
            ))
            .into());
        }

        fn field<T: std::str::FromStr>(row: &[String], index: usize) -> Result<T, BinanceRestError>
        where
            T::Err: std::fmt::Display,
        {
            row[index].trim().parse().map_err(|e: T::Err| {
                RestError::Decode(format!("kline field {index} ({:?}): {e}", row[index])).into()
            })
        }

        Ok(Self {
            open_time: field(row, 0)?,
            open: field(row, 1)?,
            high: field(row, 2)?,
            low: field(row, 3)?,
            close: field(row, 4)?,
            volume: field(row, 5)?,
            close_time: field(row, 6)?,
            quote_volume: field(row, 7)?,
            trades: field(row, 8)?,
            taker_buy_base_volume: field(row, 9)?,
            taker_buy_quote_volume: field(row, 10)?,
        })
    }
}

impl AlphaResponse<Vec<AlphaKlineRow>> {
    /// Parse every row into an [`AlphaKline`]. Empty when `data` is null.
    pub fn klines(&self) -> Result<Vec<AlphaKline>, BinanceRestError> {
        self.data
            .iter()
            .flatten()
            .map(|row| AlphaKline::try_from(row.as_slice()))
            .collect()
    }
}

/// 24h rolling statistics for one Alpha symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaTicker {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub last_price: Decimal,
    pub last_qty: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub open_time: i64,
    pub close_time: i64,
    pub first_id: i64,
    pub last_id: i64,
    pub count: i64,
    /// Only on the multi-symbol form.
    pub prev_close_price: Option<Decimal>,
    pub bid_price: Option<Decimal>,
    pub bid_qty: Option<Decimal>,
    pub ask_price: Option<Decimal>,
    pub ask_qty: Option<Decimal>,
}

/// Ticker payload: one object when a symbol is given, a list otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct AlphaTickers(#[serde(deserialize_with = "one_or_many")] pub Vec<AlphaTicker>);

pub type AlphaTickerResponse = AlphaResponse<AlphaTickers>;

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

/// One Alpha token.
///
/// Market figures stay strings: they carry more digits than `Decimal` holds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaToken {
    pub token_id: String,
    pub chain_id: String,
    pub chain_icon_url: String,
    pub chain_name: String,
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub icon_url: String,
    pub price: String,
    #[serde(rename = "percentChange24h")]
    pub percent_change_24h: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
    pub market_cap: String,
    pub fdv: String,
    pub liquidity: String,
    pub total_supply: String,
    pub circulating_supply: String,
    pub holders: String,
    pub decimals: i32,
    pub listing_cex: bool,
    pub hot_tag: bool,
    pub cex_coin_name: String,
    pub can_transfer: bool,
    pub denomination: i32,
    pub offline: bool,
    pub trade_decimal: i32,
    pub alpha_id: String,
    pub offsell: bool,
    #[serde(rename = "priceHigh24h")]
    pub price_high_24h: String,
    #[serde(rename = "priceLow24h")]
    pub price_low_24h: String,
    #[serde(rename = "count24h")]
    pub count_24h: String,
    pub online_tge: bool,
    pub online_airdrop: bool,
    pub score: i64,
    pub cex_off_display: bool,
    pub stock_state: bool,
    pub listing_time: i64,
    pub mul_point: i32,
}

pub type AlphaTokensResponse = AlphaResponse<Vec<AlphaToken>>;

/// Kline/candlestick bars for an Alpha symbol.
pub struct AlphaKlinesService<'a> {
    client: &'a BinanceRestClient,
    symbol: Option<String>,
    interval: Option<String>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    limit: Option<u32>,
}

impl<'a> AlphaKlinesService<'a> {
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

    /// Required, e.g. `ALPHA_175USDT`.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Required: `1s`, `15s`, `1m`, `3m`, `5m`, `15m`, `30m`, `1h` ... `1d`.
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

    /// Default 500, max 1000.
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

        Ok(Request::get(KLINES_PATH).host(Host::Alpha).params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<AlphaKlinesResponse>, BinanceRestError> {
        let request = self.request()?;
        self.client.execute(request).await
    }
}

/// 24h ticker statistics, for one symbol or all.
pub struct AlphaTickerService<'a> {
    client: &'a BinanceRestClient,
    symbol: Option<String>,
}

impl<'a> AlphaTickerService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            symbol: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    fn request(&self) -> Request {
        let mut params = Params::new();
        params.set_opt("symbol", self.symbol.as_deref());

        Request::get(TICKER_PATH).host(Host::Alpha).params(params)
    }

    pub async fn send(self) -> Result<ApiResponse<AlphaTickerResponse>, BinanceRestError> {
        self.client.execute(self.request()).await
    }
}

/// Every token listed on Alpha.
pub struct AlphaTokensService<'a> {
    client: &'a BinanceRestClient,
    limit: Option<u32>,
}

impl<'a> AlphaTokensService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn request(&self) -> Request {
        let mut params = Params::new();
        params.set_opt("limit", self.limit);

        Request::get(TOKENS_PATH).host(Host::Alpha).params(params)
    }

    pub async fn send(self) -> Result<ApiResponse<AlphaTokensResponse>, BinanceRestError> {
        self.client.execute(self.request()).await
    }
}
