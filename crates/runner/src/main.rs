use binance_rest::{AlphaToken, BinanceRestClient, BinanceRestError, ClientConfig};
use std::time::Duration;
use tracing::{error, info, warn};

/// Interval between ticker polls.
const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Deadline for each poll.
const POLL_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    common::init_logging();

    let symbol = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ALPHA_175USDT".to_string());

    let client = match ClientConfig::from_env().and_then(BinanceRestClient::from_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(symbol = %symbol, environment = %client.environment(), "Starting Alpha monitor");

    match client.alpha_tokens().send().await {
        Ok(response) => match response.into_data().into_data() {
            Ok(tokens) => log_token(&tokens, &symbol),
            Err(e) => warn!(error = %e, "Token list rejected"),
        },
        Err(e) => warn!(error = %e, "Failed to fetch token list"),
    }

    if let Err(e) = log_klines(&client, &symbol).await {
        warn!(error = %e, "Failed to fetch klines");
    }

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match tokio::time::timeout(POLL_TIMEOUT, client.alpha_ticker().symbol(symbol.as_str()).send()).await {
                    Ok(Ok(response)) => {
                        let weight = response.rate_limits.first().map(|l| l.count);
                        match response.into_data().into_data() {
                            Ok(tickers) => {
                                for ticker in tickers.0 {
                                    info!(
                                        symbol = %ticker.symbol,
                                        last = %ticker.last_price,
                                        change_pct = %ticker.price_change_percent,
                                        quote_volume = %ticker.quote_volume,
                                        used_weight = ?weight,
                                        "Ticker"
                                    );
                                }
                            }
                            Err(e) => warn!(error = %e, "Ticker rejected"),
                        }
                    }
                    Ok(Err(e)) => warn!(error = %e, retryable = e.is_retryable(), "Ticker request failed"),
                    Err(_) => warn!(timeout = ?POLL_TIMEOUT, "Ticker request timed out"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    info!("Shutdown complete");
}

fn log_token(tokens: &[AlphaToken], symbol: &str) {
    info!(count = tokens.len(), "Alpha tokens listed");

    let alpha_id = symbol.trim_end_matches("USDT");
    match tokens.iter().find(|t| t.alpha_id == alpha_id) {
        Some(token) => info!(
            alpha_id = %token.alpha_id,
            name = %token.name,
            chain = %token.chain_name,
            price = %token.price,
            holders = %token.holders,
            "Token"
        ),
        None => warn!(alpha_id = %alpha_id, "Symbol not in token list"),
    }
}

async fn log_klines(client: &BinanceRestClient, symbol: &str) -> Result<(), BinanceRestError> {
    let response = client
        .alpha_klines()
        .symbol(symbol)
        .interval("1h")
        .limit(24)
        .send()
        .await?
        .into_data();

    for kline in response.klines()? {
        info!(
            open_time = kline.open_time,
            open = %kline.open,
            high = %kline.high,
            low = %kline.low,
            close = %kline.close,
            volume = %kline.volume,
            trades = kline.trades,
            "Kline"
        );
    }

    Ok(())
}
