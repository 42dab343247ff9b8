use marketpulse_core::{MarketEngine, MarketMover};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct MoversResponseData {
    movers: Vec<MarketMover>,
}

pub fn run(engine: &MarketEngine) -> Result<Value, CliError> {
    let movers = engine.market_movers();
    Ok(serde_json::to_value(MoversResponseData { movers })?)
}
