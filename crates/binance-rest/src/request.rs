//! Endpoint descriptors and ordered parameter sets.

use crate::error::BinanceRestError;
use rest_client::Method;
use std::fmt::Display;

/// Authentication an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    /// Public endpoint.
    None,
    /// `X-MBX-APIKEY` header only (user data streams).
    ApiKey,
    /// API key header plus `timestamp` and HMAC `signature`.
    Signed,
}

impl SecurityType {
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Which Binance host serves the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `api.binance.com`: spot, margin and `/sapi` endpoints.
    Api,
    /// `www.binance.com`: the `/bapi` Alpha endpoints.
    Alpha,
}

/// Ordered name/value parameters.
///
/// Insertion order is kept because the signature covers the encoded string
/// exactly as sent. Re-setting a name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Set `name` only when `value` is present.
    pub fn set_opt<T: Display>(&mut self, name: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, in insertion order.
    pub fn encode(&self) -> Result<String, BinanceRestError> {
        serde_urlencoded::to_string(&self.entries)
            .map_err(|e| BinanceRestError::InvalidParameter(format!("cannot encode parameters: {e}")))
    }
}

/// One REST call: method, path, host, security and parameters.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: &'static str,
    pub host: Host,
    pub security: SecurityType,
    pub params: Params,
}

impl Request {
    pub fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            host: Host::Api,
            security: SecurityType::None,
            params: Params::new(),
        }
    }

    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &'static str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &'static str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    pub fn security(mut self, security: SecurityType) -> Self {
        self.security = security;
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Whether parameters travel in a form body rather than the query string.
    pub fn uses_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }
}

/// Unwrap a required builder field or report it by its wire name.
pub(crate) fn required<T>(value: Option<T>, name: &'static str) -> Result<T, BinanceRestError> {
    value.ok_or(BinanceRestError::MissingParameter(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_keeps_insertion_order() {
        let mut params = Params::new();
        params.set("symbol", "BTCUSDT").set("interval", "1m").set("limit", 10);

        assert_eq!(params.encode().unwrap(), "symbol=BTCUSDT&interval=1m&limit=10");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = Params::new();
        params.set("a", 1).set("b", 2).set("a", 3);

        assert_eq!(params.len(), 2);
        assert_eq!(params.encode().unwrap(), "a=3&b=2");
    }

    #[test]
    fn test_set_opt_skips_none() {
        let mut params = Params::new();
        params
            .set_opt("startTime", None::<i64>)
            .set_opt("amount", Some(dec!(10.5)))
            .set_opt("redeemAll", Some(true));

        assert_eq!(params.get("startTime"), None);
        assert_eq!(params.encode().unwrap(), "amount=10.5&redeemAll=true");
    }

    #[test]
    fn test_encode_escapes_values() {
        let mut params = Params::new();
        params.set("newClientOrderId", "a b/c&d=e");

        assert_eq!(
            params.encode().unwrap(),
            "newClientOrderId=a+b%2Fc%26d%3De"
        );
    }

    #[test]
    fn test_empty_params_encode_to_empty_string() {
        assert_eq!(Params::new().encode().unwrap(), "");
    }

    #[test]
    fn test_request_builders() {
        let request = Request::post("/sapi/v1/simple-earn/flexible/redeem")
            .security(SecurityType::Signed)
            .host(Host::Api);

        assert!(request.uses_body());
        assert!(request.security.requires_credentials());
        assert!(!Request::get("/api/v3/ping").uses_body());
        assert!(!Request::delete("/api/v3/order").uses_body());
    }

    #[test]
    fn test_required_names_missing_parameter() {
        let err = required(None::<&str>, "symbol").unwrap_err();
        assert!(matches!(err, BinanceRestError::MissingParameter("symbol")));
    }
}
