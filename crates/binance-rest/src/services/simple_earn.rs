//! Simple Earn flexible products.

use crate::client::BinanceRestClient;
use crate::error::BinanceRestError;
use crate::request::{required, Params, Request, SecurityType};
use crate::response::ApiResponse;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

const PRODUCT_LIST_PATH: &str = "/sapi/v1/simple-earn/flexible/list";
const POSITION_PATH: &str = "/sapi/v1/simple-earn/flexible/position";
const SUBSCRIBE_PATH: &str = "/sapi/v1/simple-earn/flexible/subscribe";
const REDEEM_PATH: &str = "/sapi/v1/simple-earn/flexible/redeem";

/// Paged flexible product list.
#[derive(Debug, Clone, Deserialize)]
pub struct FlexibleProductList {
    pub rows: Vec<FlexibleProduct>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleProduct {
    pub asset: String,
    pub latest_annual_percentage_rate: Decimal,
    /// Keyed by tier label, e.g. `"0-5BTC"`.
    #[serde(default)]
    pub tier_annual_percentage_rate: HashMap<String, Decimal>,
    pub air_drop_percentage_rate: Option<Decimal>,
    pub can_purchase: bool,
    pub can_redeem: bool,
    pub is_sold_out: bool,
    pub hot: bool,
    pub min_purchase_amount: Decimal,
    pub product_id: String,
    pub subscription_start_time: i64,
    pub status: String,
}

/// Paged flexible positions.
#[derive(Debug, Clone, Deserialize)]
pub struct FlexiblePositionList {
    pub rows: Vec<FlexiblePosition>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexiblePosition {
    pub total_amount: Decimal,
    pub latest_annual_percentage_rate: Decimal,
    pub asset: String,
    pub can_redeem: bool,
    pub collateral_amount: Decimal,
    pub product_id: String,
    pub yesterday_real_time_rewards: Decimal,
    pub cumulative_bonus_rewards: Decimal,
    pub cumulative_real_time_rewards: Decimal,
    pub cumulative_total_rewards: Decimal,
    pub auto_subscribe: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeFlexibleResponse {
    /// Older API versions call this `subscribeId`.
    #[serde(alias = "subscribeId")]
    pub purchase_id: u64,
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemFlexibleResponse {
    pub redeem_id: u64,
    pub success: bool,
}

/// Flexible products available for subscription.
pub struct SimpleEarnFlexibleProductListService<'a> {
    client: &'a BinanceRestClient,
    asset: Option<String>,
    current: Option<u32>,
    size: Option<u32>,
}

impl<'a> SimpleEarnFlexibleProductListService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            asset: None,
            current: None,
            size: None,
        }
    }

    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Page number, starting at 1.
    pub fn current(mut self, current: u32) -> Self {
        self.current = Some(current);
        self
    }

    /// Page size. Default 10, max 100.
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    fn request(&self) -> Request {
        let mut params = Params::new();
        params
            .set_opt("asset", self.asset.as_deref())
            .set_opt("current", self.current)
            .set_opt("size", self.size);

        Request::get(PRODUCT_LIST_PATH)
            .security(SecurityType::Signed)
            .params(params)
    }

    pub async fn send(self) -> Result<ApiResponse<FlexibleProductList>, BinanceRestError> {
        self.client.execute(self.request()).await
    }
}

/// Flexible positions held by the account.
pub struct FlexiblePositionService<'a> {
    client: &'a BinanceRestClient,
    asset: Option<String>,
    product_id: Option<String>,
    current: Option<u32>,
    size: Option<u32>,
}

impl<'a> FlexiblePositionService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            asset: None,
            product_id: None,
            current: None,
            size: None,
        }
    }

    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn current(mut self, current: u32) -> Self {
        self.current = Some(current);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    fn request(&self) -> Request {
        let mut params = Params::new();
        params
            .set_opt("asset", self.asset.as_deref())
            .set_opt("productId", self.product_id.as_deref())
            .set_opt("current", self.current)
            .set_opt("size", self.size);

        Request::get(POSITION_PATH)
            .security(SecurityType::Signed)
            .params(params)
    }

    pub async fn send(self) -> Result<ApiResponse<FlexiblePositionList>, BinanceRestError> {
        self.client.execute(self.request()).await
    }
}

/// Subscribe an amount into a flexible product.
pub struct SubscribeFlexibleService<'a> {
    client: &'a BinanceRestClient,
    product_id: Option<String>,
    amount: Option<Decimal>,
    auto_subscribe: Option<bool>,
}

impl<'a> SubscribeFlexibleService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            product_id: None,
            amount: None,
            auto_subscribe: None,
        }
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Server default is `true`.
    pub fn auto_subscribe(mut self, auto_subscribe: bool) -> Self {
        self.auto_subscribe = Some(auto_subscribe);
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let mut params = Params::new();
        params
            .set("productId", required(self.product_id.as_deref(), "productId")?)
            .set("amount", required(self.amount, "amount")?)
            .set_opt("autoSubscribe", self.auto_subscribe);

        Ok(Request::post(SUBSCRIBE_PATH)
            .security(SecurityType::Signed)
            .params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<SubscribeFlexibleResponse>, BinanceRestError> {
        let request = self.request()?;
        tracing::info!(
            product_id = request.params.get("productId"),
            amount = request.params.get("amount"),
            "Subscribing to flexible product"
        );
        self.client.execute(request).await
    }
}

/// Redeem from a flexible product, either an amount or everything.
pub struct RedeemFlexibleService<'a> {
    client: &'a BinanceRestClient,
    product_id: Option<String>,
    amount: Option<Decimal>,
}

impl<'a> RedeemFlexibleService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            product_id: None,
            amount: None,
        }
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Without an amount the whole position is redeemed.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let mut params = Params::new();
        params.set("productId", required(self.product_id.as_deref(), "productId")?);
        match self.amount {
            Some(amount) => params.set("amount", amount),
            None => params.set("redeemAll", true),
        };

        Ok(Request::post(REDEEM_PATH)
            .security(SecurityType::Signed)
            .params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<RedeemFlexibleResponse>, BinanceRestError> {
        let request = self.request()?;
        tracing::info!(
            product_id = request.params.get("productId"),
            amount = request.params.get("amount"),
            redeem_all = request.params.get("redeemAll").is_some(),
            "Redeeming flexible product"
        );
        self.client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockServer, TEST_API_KEY, TEST_SECRET};
    use auth::{ApiCredentials, AuthError};
    use rust_decimal_macros::dec;

    fn signed_client(server: &MockServer) -> BinanceRestClient {
        BinanceRestClient::from_config(
            server
                .config()
                .with_credentials(ApiCredentials::new(TEST_API_KEY.into(), TEST_SECRET.into())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_product_list() {
        let body = r#"{
            "rows": [{
                "asset": "BTC",
                "latestAnnualPercentageRate": "0.05000000",
                "tierAnnualPercentageRate": {"0-5BTC": "0.05", "5-10BTC": "0.03"},
                "airDropPercentageRate": "0.05000000",
                "canPurchase": true,
                "canRedeem": true,
                "isSoldOut": true,
                "hot": true,
                "minPurchaseAmount": "0.01000000",
                "productId": "BTC001",
                "subscriptionStartTime": 1646182276000,
                "status": "PURCHASING"
            }],
            "total": 1
        }"#;
        let server = MockServer::start(200, body).await;
        let client = signed_client(&server);

        let list = client
            .simple_earn_flexible_product_list()
            .asset("BTC")
            .current(1)
            .size(10)
            .send()
            .await
            .unwrap()
            .into_data();

        assert_eq!(list.total, 1);
        let product = &list.rows[0];
        assert_eq!(product.asset, "BTC");
        assert_eq!(product.latest_annual_percentage_rate, dec!(0.05));
        assert_eq!(product.tier_annual_percentage_rate["0-5BTC"], dec!(0.05));
        assert_eq!(product.tier_annual_percentage_rate["5-10BTC"], dec!(0.03));
        assert_eq!(product.air_drop_percentage_rate, Some(dec!(0.05)));
        assert!(product.can_purchase && product.is_sold_out && product.hot);
        assert_eq!(product.min_purchase_amount, dec!(0.01));
        assert_eq!(product.product_id, "BTC001");
        assert_eq!(product.subscription_start_time, 1646182276000);
        assert_eq!(product.status, "PURCHASING");

        let captured = server.last_request();
        assert_eq!(captured.method, "GET");
        assert_eq!(captured.path, PRODUCT_LIST_PATH);
        assert_eq!(captured.api_key.as_deref(), Some(TEST_API_KEY));
        assert!(captured
            .query
            .as_deref()
            .unwrap()
            .starts_with("asset=BTC&current=1&size=10&timestamp="));
        assert!(captured.query_param("signature").is_some());
    }

    #[tokio::test]
    async fn test_position_list() {
        let body = r#"{
            "rows": [{
                "totalAmount": "75.46000000",
                "latestAnnualPercentageRate": "0.02599895",
                "asset": "USDT",
                "canRedeem": true,
                "collateralAmount": "232.23123213",
                "productId": "USDT001",
                "yesterdayRealTimeRewards": "0.10293829",
                "cumulativeBonusRewards": "0.22759183",
                "cumulativeRealTimeRewards": "0.22759183",
                "cumulativeTotalRewards": "0.45459183",
                "autoSubscribe": true
            }],
            "total": 1
        }"#;
        let server = MockServer::start(200, body).await;
        let client = signed_client(&server);

        let positions = client
            .flexible_position()
            .product_id("USDT001")
            .send()
            .await
            .unwrap()
            .into_data();

        let position = &positions.rows[0];
        assert_eq!(position.total_amount, dec!(75.46));
        assert_eq!(position.collateral_amount, dec!(232.23123213));
        assert_eq!(position.cumulative_total_rewards, dec!(0.45459183));
        assert!(position.auto_subscribe);
        assert_eq!(
            server.last_request().query_param("productId").as_deref(),
            Some("USDT001")
        );
    }

    #[tokio::test]
    async fn test_subscribe_posts_form_body() {
        let server = MockServer::start(200, r#"{"purchaseId":40607,"success":true}"#).await;
        let client = signed_client(&server);

        let response = client
            .subscribe_flexible()
            .product_id("USDT001")
            .amount(dec!(100.5))
            .auto_subscribe(false)
            .send()
            .await
            .unwrap()
            .into_data();

        assert_eq!(response.purchase_id, 40607);
        assert!(response.success);

        let captured = server.last_request();
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.query, None);
        assert!(captured
            .body
            .starts_with("productId=USDT001&amount=100.5&autoSubscribe=false&timestamp="));
    }

    #[test]
    fn test_subscribe_accepts_legacy_id_name() {
        let response: SubscribeFlexibleResponse =
            serde_json::from_str(r#"{"subscribeId":7,"success":true}"#).unwrap();
        assert_eq!(response.purchase_id, 7);
    }

    #[tokio::test]
    async fn test_subscribe_requires_amount() {
        let server = MockServer::start(200, "{}").await;
        let client = signed_client(&server);

        let err = client
            .subscribe_flexible()
            .product_id("USDT001")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, BinanceRestError::MissingParameter("amount")));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_redeem_all_when_no_amount() {
        let server = MockServer::start(200, r#"{"redeemId":40607,"success":true}"#).await;
        let client = signed_client(&server);

        let response = client
            .redeem_flexible()
            .product_id("USDT001")
            .send()
            .await
            .unwrap()
            .into_data();

        assert_eq!(response.redeem_id, 40607);
        let captured = server.last_request();
        assert_eq!(captured.body_param("redeemAll").as_deref(), Some("true"));
        assert_eq!(captured.body_param("amount"), None);
    }

    #[tokio::test]
    async fn test_redeem_partial_amount() {
        let server = MockServer::start(200, r#"{"redeemId":1,"success":true}"#).await;
        let client = signed_client(&server);

        client
            .redeem_flexible()
            .product_id("USDT001")
            .amount(dec!(2.5))
            .send()
            .await
            .unwrap();

        let captured = server.last_request();
        assert_eq!(captured.body_param("amount").as_deref(), Some("2.5"));
        assert_eq!(captured.body_param("redeemAll"), None);
    }

    #[tokio::test]
    async fn test_signed_without_credentials() {
        let server = MockServer::start(200, "{}").await;
        let client = BinanceRestClient::from_config(server.config()).unwrap();

        let err = client
            .simple_earn_flexible_product_list()
            .send()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BinanceRestError::Auth(AuthError::MissingCredentials { .. })
        ));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_binance_error_body_is_parsed() {
        let server =
            MockServer::start(400, r#"{"code":-6005,"msg":"Redemption amount is too small"}"#)
                .await;
        let client = signed_client(&server);

        let err = client
            .redeem_flexible()
            .product_id("USDT001")
            .amount(dec!(0.00000001))
            .send()
            .await
            .unwrap_err();

        match err {
            BinanceRestError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, -6005);
                assert_eq!(message, "Redemption amount is too small");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(server.hits(), 1);
    }
}
