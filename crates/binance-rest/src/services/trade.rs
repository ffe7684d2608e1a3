//! Spot order placement, lookup and cancellation.

use crate::client::BinanceRestClient;
use crate::enums::{NewOrderRespType, OrderSide, OrderType, TimeInForce};
use crate::error::BinanceRestError;
use crate::request::{required, Params, Request, SecurityType};
use crate::response::ApiResponse;
use crate::responses::{NewOrderResponse, OrderResponse};
use rust_decimal::Decimal;

const ORDER_PATH: &str = "/api/v3/order";

/// Place a spot order.
///
/// Checks the parameters each order type needs before sending:
/// `timeInForce` and `price` for limit types, `stopPrice` for stop and
/// take-profit types, and `quantity` (or `quoteOrderQty` for MARKET).
pub struct NewOrderService<'a> {
    client: &'a BinanceRestClient,
    symbol: Option<String>,
    side: Option<OrderSide>,
    order_type: Option<OrderType>,
    time_in_force: Option<TimeInForce>,
    quantity: Option<Decimal>,
    quote_order_qty: Option<Decimal>,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
    new_client_order_id: Option<String>,
    new_order_resp_type: Option<NewOrderRespType>,
}

impl<'a> NewOrderService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            symbol: None,
            side: None,
            order_type: None,
            time_in_force: None,
            quantity: None,
            quote_order_qty: None,
            price: None,
            stop_price: None,
            new_client_order_id: None,
            new_order_resp_type: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// MARKET only: spend (or receive) this much quote asset.
    pub fn quote_order_qty(mut self, quote_order_qty: Decimal) -> Self {
        self.quote_order_qty = Some(quote_order_qty);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    /// Client order ID, for idempotent retries and lookups.
    pub fn new_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(client_order_id.into());
        self
    }

    pub fn new_order_resp_type(mut self, resp_type: NewOrderRespType) -> Self {
        self.new_order_resp_type = Some(resp_type);
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        let symbol = required(self.symbol.as_deref(), "symbol")?;
        let side = required(self.side, "side")?;
        let order_type = required(self.order_type, "type")?;

        if order_type.requires_time_in_force() && self.time_in_force.is_none() {
            return Err(BinanceRestError::MissingParameter("timeInForce"));
        }
        if order_type.requires_price() && self.price.is_none() {
            return Err(BinanceRestError::MissingParameter("price"));
        }
        if order_type.requires_stop_price() && self.stop_price.is_none() {
            return Err(BinanceRestError::MissingParameter("stopPrice"));
        }
        match order_type {
            OrderType::Market => {
                if self.quantity.is_some() && self.quote_order_qty.is_some() {
                    return Err(BinanceRestError::InvalidParameter(
                        "quantity and quoteOrderQty are mutually exclusive".to_string(),
                    ));
                }
                if self.quantity.is_none() && self.quote_order_qty.is_none() {
                    return Err(BinanceRestError::MissingParameter("quantity"));
                }
            }
            _ => {
                required(self.quantity, "quantity")?;
            }
        }

        let mut params = Params::new();
        params
            .set("symbol", symbol)
            .set("side", side)
            .set("type", order_type)
            .set_opt("timeInForce", self.time_in_force)
            .set_opt("quantity", self.quantity)
            .set_opt("quoteOrderQty", self.quote_order_qty)
            .set_opt("price", self.price)
            .set_opt("stopPrice", self.stop_price)
            .set_opt("newClientOrderId", self.new_client_order_id.as_deref())
            .set_opt("newOrderRespType", self.new_order_resp_type);

        Ok(Request::post(ORDER_PATH)
            .security(SecurityType::Signed)
            .params(params))
    }

    pub async fn send(self) -> Result<ApiResponse<NewOrderResponse>, BinanceRestError> {
        let request = self.request()?;

        tracing::info!(
            symbol = ?self.symbol,
            side = ?self.side,
            order_type = ?self.order_type,
            quantity = ?self.quantity,
            price = ?self.price,
            client_order_id = ?self.new_client_order_id,
            "Placing order"
        );

        let response: ApiResponse<NewOrderResponse> = self.client.execute(request).await?;

        tracing::info!(
            order_id = response.data.order_id,
            client_order_id = %response.data.client_order_id,
            status = ?response.data.status,
            "Order placed"
        );

        Ok(response)
    }
}

/// Identifies an existing order by exchange ID or client ID.
#[derive(Debug, Clone, Default)]
struct OrderRef {
    symbol: Option<String>,
    order_id: Option<u64>,
    orig_client_order_id: Option<String>,
}

impl OrderRef {
    /// Both IDs are sent when set; the exchange looks up by `orderId` first.
    fn params(&self) -> Result<Params, BinanceRestError> {
        let symbol = required(self.symbol.as_deref(), "symbol")?;
        if self.order_id.is_none() && self.orig_client_order_id.is_none() {
            return Err(BinanceRestError::MissingParameter("orderId"));
        }

        let mut params = Params::new();
        params
            .set("symbol", symbol)
            .set_opt("orderId", self.order_id)
            .set_opt("origClientOrderId", self.orig_client_order_id.as_deref());
        Ok(params)
    }
}

/// Look up one order's status.
pub struct QueryOrderService<'a> {
    client: &'a BinanceRestClient,
    order: OrderRef,
}

impl<'a> QueryOrderService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            order: OrderRef::default(),
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.order.symbol = Some(symbol.into());
        self
    }

    pub fn order_id(mut self, order_id: u64) -> Self {
        self.order.order_id = Some(order_id);
        self
    }

    pub fn orig_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.order.orig_client_order_id = Some(client_order_id.into());
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        Ok(Request::get(ORDER_PATH)
            .security(SecurityType::Signed)
            .params(self.order.params()?))
    }

    pub async fn send(self) -> Result<ApiResponse<OrderResponse>, BinanceRestError> {
        let request = self.request()?;
        self.client.execute(request).await
    }
}

/// Cancel an active order.
pub struct CancelOrderService<'a> {
    client: &'a BinanceRestClient,
    order: OrderRef,
}

impl<'a> CancelOrderService<'a> {
    pub(crate) fn new(client: &'a BinanceRestClient) -> Self {
        Self {
            client,
            order: OrderRef::default(),
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.order.symbol = Some(symbol.into());
        self
    }

    pub fn order_id(mut self, order_id: u64) -> Self {
        self.order.order_id = Some(order_id);
        self
    }

    pub fn orig_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.order.orig_client_order_id = Some(client_order_id.into());
        self
    }

    fn request(&self) -> Result<Request, BinanceRestError> {
        Ok(Request::delete(ORDER_PATH)
            .security(SecurityType::Signed)
            .params(self.order.params()?))
    }

    pub async fn send(self) -> Result<ApiResponse<OrderResponse>, BinanceRestError> {
        let request = self.request()?;

        tracing::info!(
            symbol = ?self.order.symbol,
            order_id = ?self.order.order_id,
            client_order_id = ?self.order.orig_client_order_id,
            "Canceling order"
        );

        let response: ApiResponse<OrderResponse> = self.client.execute(request).await?;

        tracing::info!(
            order_id = response.data.order_id,
            status = %response.data.status,
            "Order canceled"
        );

        Ok(response)
    }
}
