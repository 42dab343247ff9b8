use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{fetch_body, TickerProvider, UpstreamError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{InstrumentKey, TickerSnapshot};

const TICKER_ENDPOINT: &str = "https://api.binance.com/api/v3/ticker/24hr";
const PROVIDER: &str = "binance";

/// Binance public 24h ticker adapter. No credentials required.
#[derive(Clone)]
pub struct BinanceTickerAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl BinanceTickerAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn ticker_url(pairs: &[InstrumentKey]) -> Result<String, UpstreamError> {
        let symbols: Vec<&str> = pairs.iter().map(InstrumentKey::as_str).collect();
        let encoded = serde_json::to_string(&symbols).map_err(|e| {
            UpstreamError::malformed(format!("failed to encode binance symbols: {e}"))
        })?;
        Ok(format!(
            "{TICKER_ENDPOINT}?symbols={}",
            urlencoding::encode(&encoded)
        ))
    }
}

impl TickerProvider for BinanceTickerAdapter {
    fn fetch_tickers<'a>(
        &'a self,
        pairs: &'a [InstrumentKey],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TickerSnapshot>, UpstreamError>> + Send + 'a>>
    {
        Box::pin(async move {
            if pairs.is_empty() {
                return Ok(Vec::new());
            }

            let request = HttpRequest::get(Self::ticker_url(pairs)?).with_timeout(self.timeout);
            let body = fetch_body(self.http_client.as_ref(), request, PROVIDER).await?;
            parse_tickers(&body, pairs)
        })
    }
}

fn parse_tickers(body: &str, pairs: &[InstrumentKey]) -> Result<Vec<TickerSnapshot>, UpstreamError> {
    let tickers: Vec<BinanceTicker> = serde_json::from_str(body).map_err(|e| {
        UpstreamError::malformed(format!("failed to parse binance ticker response: {e}"))
    })?;

    let mut snapshots = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let Some(pair) = pairs.iter().find(|pair| pair.as_str() == ticker.symbol) else {
            continue;
        };

        let snapshot = TickerSnapshot::new(
            pair.clone(),
            parse_decimal(&ticker.symbol, "lastPrice", &ticker.last_price)?,
            parse_decimal(&ticker.symbol, "priceChangePercent", &ticker.price_change_percent)?,
            parse_decimal(&ticker.symbol, "quoteVolume", &ticker.quote_volume)?,
            parse_decimal(&ticker.symbol, "highPrice", &ticker.high_price)?,
            parse_decimal(&ticker.symbol, "lowPrice", &ticker.low_price)?,
        )
        .map_err(|error| UpstreamError::from_validation(PROVIDER, &error))?;
        snapshots.push(snapshot);
    }

    Ok(snapshots)
}

fn parse_decimal(symbol: &str, field: &str, raw: &str) -> Result<f64, UpstreamError> {
    raw.trim().parse::<f64>().map_err(|_| {
        UpstreamError::malformed(format!(
            "binance field '{field}' for {symbol} is not numeric: '{raw}'"
        ))
    })
}

/// Binance encodes decimals as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker {
    symbol: String,
    last_price: String,
    price_change_percent: String,
    quote_volume: String,
    high_price: String,
    low_price: String,
}
