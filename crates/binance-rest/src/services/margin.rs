//! Cross margin account queries.

use crate::client::BinanceRestClient;
use crate::error::BinanceRestError;
use crate::request::{required, Params, Request, SecurityType};
use crate::response::ApiResponse;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Cross margin account details.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAccount {
    pub borrow_enabled: bool,
    pub margin_level: Decimal,
    #[serde(rename = "totalAssetOfBtc")]
    pub total_asset_of_btc: Decimal,
    #[serde(rename = "totalLiabilityOfBtc")]
    pub total_liability_of_btc: Decimal,
    #[serde(rename = "totalNetAssetOfBtc")]
    pub total_net_asset_of_btc: Decimal,
    pub trade_enabled: bool,
    pub transfer_enabled: bool,
    #[serde(default)]
    pub user_assets: Vec<MarginAsset>,
}

impl MarginAccount {
    pub fn asset(&self, asset: &str) -> Option<&MarginAsset> {
        self.user_assets.iter().find(|a| a.asset == asset)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAsset {
    pub asset: String,
    pub borrowed: Decimal,
    pub free: Decimal,
    pub interest: Decimal,
    pub locked: Decimal,
    pub net_asset: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxBorrowable {
    /// Account's currently available amount to borrow.
    pub amount: Decimal,
    /// Max amount by the system's limit.
    pub borrow_limit: Option<Decimal>,
}

/// Cross margin balances and risk level.
pub struct MarginAccountService<'a> {
    client: &'a BinanceRestClient,
}

impl<'a> MarginAccountService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> Result<ApiResponse<MarginAccount>, BinanceRestError> {
        self.client
            .execute(Request::get("/sapi/v1/margin/account").security(SecurityType::Signed))
            .await
    }
}

/// Largest amount of an asset that can be borrowed right now.
pub struct MarginMaxBorrowableService<'a> {
    client: &'a BinanceRestClient,
    asset: Option<String>,
    isolated_symbol: Option<String>,
}

impl<'a> MarginMaxBorrowableService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            asset: None,
            isolated_symbol: None,
        }
    }

    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Isolated margin pair; cross margin when unset.
    pub fn isolated_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.isolated_symbol = Some(symbol.into());
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let mut params = Params::new();
        params
            .set("asset", required(self.asset.as_deref(), "asset")?)
            .set_opt("isolatedSymbol", self.isolated_symbol.as_deref());

        Ok(Request::get("/sapi/v1/margin/maxBorrowable")
            .security(SecurityType::Signed)
            .params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<MaxBorrowable>, BinanceRestError> {
        let request = self.request()?;
        self.client.execute(request).await
    }
}
