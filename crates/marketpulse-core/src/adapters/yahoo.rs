use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{fetch_body, QuoteProvider, UpstreamError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{InstrumentKey, RawQuote};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
const PROVIDER: &str = "yahoo";

/// Yahoo v8 chart adapter: one day of 15-minute bars per index symbol.
#[derive(Clone)]
pub struct YahooChartAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl YahooChartAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout: Duration::from_secs(6),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chart_url(symbol: &InstrumentKey) -> String {
        format!(
            "{CHART_ENDPOINT}/{}?range=1d&interval=15m",
            urlencoding::encode(symbol.as_str())
        )
    }
}

impl QuoteProvider for YahooChartAdapter {
    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a InstrumentKey,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::chart_url(symbol))
                .with_header("user-agent", BROWSER_USER_AGENT)
                .with_timeout(self.timeout);

            let body = fetch_body(self.http_client.as_ref(), request, PROVIDER).await?;
            parse_chart(&body)
        })
    }
}

fn parse_chart(body: &str) -> Result<RawQuote, UpstreamError> {
    let response: YahooChartResponse = serde_json::from_str(body).map_err(|e| {
        UpstreamError::malformed(format!("failed to parse yahoo chart response: {e}"))
    })?;

    if let Some(error) = response.chart.error {
        return Err(UpstreamError::unavailable(format!(
            "yahoo chart error: {error}"
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| UpstreamError::malformed("yahoo chart response has no result"))?;

    let closes: Vec<f64> = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close.into_iter().flatten().collect())
        .unwrap_or_default();

    let previous_close = result
        .meta
        .chart_previous_close
        .or(result.meta.previous_close)
        .unwrap_or(0.0);
    let current_value = result
        .meta
        .regular_market_price
        .or_else(|| closes.last().copied())
        .unwrap_or(previous_close);

    RawQuote::new(current_value, previous_close, closes)
        .map_err(|error| UpstreamError::from_validation(PROVIDER, &error))
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
