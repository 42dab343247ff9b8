use marketpulse_core::{CryptoQuote, MarketEngine};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct CryptoResponseData {
    assets: Vec<CryptoQuote>,
}

pub async fn run(engine: &MarketEngine) -> Result<Value, CliError> {
    let assets = engine.crypto_board().await;
    Ok(serde_json::to_value(CryptoResponseData { assets })?)
}
