use marketpulse_core::{ExchangeSnapshot, MarketEngine};
use serde::Serialize;
use serde_json::Value;

use crate::cli::ExchangeArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ExchangesResponseData {
    exchanges: Vec<ExchangeSnapshot>,
}

pub async fn run_all(engine: &MarketEngine) -> Result<Value, CliError> {
    let exchanges = engine.exchanges().await;
    Ok(serde_json::to_value(ExchangesResponseData { exchanges })?)
}

pub async fn run_one(args: &ExchangeArgs, engine: &MarketEngine) -> Result<Value, CliError> {
    let snapshot = engine.exchange(&args.id).await?;
    Ok(serde_json::to_value(snapshot)?)
}
