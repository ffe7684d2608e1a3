//! Decoded response wrapper with HTTP metadata.

use rest_client::RawResponse;

/// Decoded payload plus the HTTP status and rate-limit usage reported with it.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub rate_limits: Vec<RateLimit>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// What a rate-limit counter measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitType {
    RequestWeight,
    Orders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitInterval {
    Second,
    Minute,
    Hour,
    Day,
}

/// Usage counter from an `X-MBX-USED-WEIGHT-*` or `X-MBX-ORDER-COUNT-*` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub rate_limit_type: RateLimitType,
    pub interval: RateLimitInterval,
    pub interval_num: u32,
    pub count: u64,
}

const USED_WEIGHT_PREFIX: &str = "x-mbx-used-weight-";
const ORDER_COUNT_PREFIX: &str = "x-mbx-order-count-";

impl RateLimit {
    /// Collect every recognised rate-limit header from a response.
    pub fn from_response(response: &RawResponse) -> Vec<Self> {
        response
            .headers
            .iter()
            .filter_map(|(name, value)| Self::parse_header(name.as_str(), value.to_str().ok()?))
            .collect()
    }

    /// Parse one header, e.g. `x-mbx-used-weight-1m: 46`.
    ///
    /// Header names arrive lowercased from the HTTP stack.
    pub fn parse_header(name: &str, value: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let (rate_limit_type, suffix) = if let Some(rest) = name.strip_prefix(USED_WEIGHT_PREFIX) {
            (RateLimitType::RequestWeight, rest)
        } else if let Some(rest) = name.strip_prefix(ORDER_COUNT_PREFIX) {
            (RateLimitType::Orders, rest)
        } else {
            return None;
        };

        let split = suffix.len().checked_sub(1)?;
        let (num, unit) = suffix.split_at(split);
        let interval = match unit {
            "s" => RateLimitInterval::Second,
            "m" => RateLimitInterval::Minute,
            "h" => RateLimitInterval::Hour,
            "d" => RateLimitInterval::Day,
            _ => return None,
        };

        Some(Self {
            rate_limit_type,
            interval,
            interval_num: num.parse().ok()?,
            count: value.trim().parse().ok()?,
        })
    }
}
