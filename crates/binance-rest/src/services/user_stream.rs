//! User data stream listen keys.
//!
//! A key expires 60 minutes after creation unless kept alive; Binance
//! recommends a keepalive every 30 minutes.

use crate::client::BinanceRestClient;
use crate::error::BinanceRestError;
use crate::request::{Params, Request, SecurityType};
use crate::responses::ListenKeyResponse;
use serde::de::IgnoredAny;

const USER_DATA_STREAM_PATH: &str = "/api/v3/userDataStream";

impl BinanceRestClient {
    /// Create a listen key for the user data stream.
    pub async fn create_listen_key(&self) -> Result<String, BinanceRestError> {
        let response = self
            .execute::<ListenKeyResponse>(
                Request::post(USER_DATA_STREAM_PATH).security(SecurityType::ApiKey),
            )
            .await?;

        tracing::info!(
            listen_key = %response.data.listen_key,
            "Created listen key"
        );

        Ok(response.data.listen_key)
    }

    /// Extend a listen key's validity by 60 minutes.
    pub async fn keepalive_listen_key(&self, listen_key: &str) -> Result<(), BinanceRestError> {
        self.execute::<IgnoredAny>(listen_key_request(
            Request::put(USER_DATA_STREAM_PATH),
            listen_key,
        ))
        .await?;

        tracing::debug!("Listen key refreshed");
        Ok(())
    }

    /// Close a listen key, ending its stream.
    pub async fn close_listen_key(&self, listen_key: &str) -> Result<(), BinanceRestError> {
        self.execute::<IgnoredAny>(listen_key_request(
            Request::delete(USER_DATA_STREAM_PATH),
            listen_key,
        ))
        .await?;

        tracing::info!("Listen key closed");
        Ok(())
    }
}

fn listen_key_request(request: Request, listen_key: &str) -> Request {
    let mut params = Params::new();
    params.set("listenKey", listen_key);
    request.security(SecurityType::ApiKey).params(params)
}
