//! Credentials and request signing for Binance.
//!
//! - **Credentials**: the API secret lives in a `SecretString`, so it is
//!   redacted from `Debug` output and zeroed on drop.
//! - **HMAC-SHA256 signing**: signs the exact encoded parameter string sent
//!   on the wire.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiCredentials, RequestSigner};
//!
//! let credentials = ApiCredentials::from_env()?;
//! let signer = RequestSigner::new(&credentials);
//! let signed = signer.sign_encoded("symbol=BTCUSDT&timestamp=1499827319559");
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::ApiCredentials;
pub use error::AuthError;
pub use signer::RequestSigner;
