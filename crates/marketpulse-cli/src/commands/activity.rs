use marketpulse_core::{CountryActivity, HotEvent, MarketEngine};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ActivityResponseData {
    countries: CountryActivity,
}

#[derive(Debug, Serialize)]
struct EventsResponseData {
    events: Vec<HotEvent>,
}

pub fn run_countries(engine: &MarketEngine) -> Result<Value, CliError> {
    let countries = engine.country_activity();
    Ok(serde_json::to_value(ActivityResponseData { countries })?)
}

pub fn run_events(engine: &MarketEngine) -> Result<Value, CliError> {
    let events = engine.hot_events();
    Ok(serde_json::to_value(EventsResponseData { events })?)
}
