use serde::{Deserialize, Serialize};

use crate::{ExchangeDescriptor, QuotePayload, QuoteSource, SentimentPolarity};

/// Per-exchange aggregate: static descriptor, session state, and derived quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSnapshot {
    pub id: String,
    pub name: String,
    pub country: String,
    pub index_name: String,
    pub currency: String,
    pub timezone: String,
    pub open_time: String,
    pub close_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    pub index_value: String,
    pub percentage_change: f64,
    pub sentiment_polarity: SentimentPolarity,
    pub heat_score: u8,
    pub sparkline: Vec<f64>,
    pub previous_close: f64,
    pub source: QuoteSource,
}

impl ExchangeSnapshot {
    pub fn new(descriptor: &ExchangeDescriptor, is_open: bool, quote: QuotePayload) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            country: descriptor.country.clone(),
            index_name: descriptor.index_name.clone(),
            currency: descriptor.currency.clone(),
            timezone: descriptor.timezone.clone(),
            open_time: descriptor.open_time.clone(),
            close_time: descriptor.close_time.clone(),
            latitude: descriptor.latitude,
            longitude: descriptor.longitude,
            is_open,
            index_value: quote.display_value(),
            percentage_change: quote.percentage_change,
            sentiment_polarity: quote.sentiment_polarity,
            heat_score: quote.heat_score,
            sparkline: quote.recent_window,
            previous_close: quote.previous_close,
            source: quote.source,
        }
    }
}

/// Simulated top-mover row for the equity board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMover {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    pub change_pct: f64,
    pub volume: u64,
    pub source: QuoteSource,
}
