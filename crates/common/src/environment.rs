//! Binance environment selection.
//!
//! Maps production/testnet to the REST hosts the connector talks to.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Binance environment (production or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinanceEnvironment {
    /// Production environment (real money).
    #[default]
    Production,
    /// Spot testnet (fake money). Serves `/api` only.
    Testnet,
}

impl BinanceEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Testnet => "testnet",
        }
    }

    /// Spot/margin/sapi REST base URL.
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.binance.com",
            Self::Testnet => "https://testnet.binance.vision",
        }
    }

    /// Base URL for the web-hosted `/bapi` endpoints (Alpha).
    ///
    /// There is no testnet for these, so both environments share the host.
    pub fn alpha_base_url(&self) -> &'static str {
        "https://www.binance.com"
    }

    /// Whether `/sapi` (Simple Earn, margin) is served. The spot testnet
    /// answers those paths with 404.
    pub fn supports_sapi(&self) -> bool {
        self.is_production()
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl fmt::Display for BinanceEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinanceEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "mainnet" | "main" => Ok(Self::Production),
            "testnet" | "test" | "sandbox" => Ok(Self::Testnet),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid environment '{0}', expected 'production' or 'testnet'")]
pub struct ParseEnvironmentError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts() {
        let prod = BinanceEnvironment::Production;
        assert_eq!(prod.rest_base_url(), "https://api.binance.com");
        assert_eq!(prod.alpha_base_url(), "https://www.binance.com");
        assert!(prod.supports_sapi());

        let testnet = BinanceEnvironment::Testnet;
        assert_eq!(testnet.rest_base_url(), "https://testnet.binance.vision");
        assert_eq!(testnet.alpha_base_url(), "https://www.binance.com");
        assert!(!testnet.supports_sapi());
    }

    #[test]
    fn test_parse_aliases() {
        for alias in ["production", "prod", "MAINNET", "main"] {
            assert_eq!(
                alias.parse::<BinanceEnvironment>().unwrap(),
                BinanceEnvironment::Production
            );
        }
        for alias in ["testnet", "Test", " sandbox "] {
            assert_eq!(
                alias.parse::<BinanceEnvironment>().unwrap(),
                BinanceEnvironment::Testnet
            );
        }
    }

    #[test]
    fn test_parse_error_names_input() {
        let err = "staging".parse::<BinanceEnvironment>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid environment 'staging', expected 'production' or 'testnet'"
        );
    }

    #[test]
    fn test_display_round_trips() {
        for env in [BinanceEnvironment::Production, BinanceEnvironment::Testnet] {
            assert_eq!(env.to_string().parse::<BinanceEnvironment>().unwrap(), env);
        }
        assert_eq!(BinanceEnvironment::default(), BinanceEnvironment::Production);
    }
}
