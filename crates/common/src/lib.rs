//! Shared building blocks for the Binance connector crates.

mod backoff;
mod environment;

pub use backoff::{BackoffPolicy, ExponentialBackoff};
pub use environment::{BinanceEnvironment, ParseEnvironmentError};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
