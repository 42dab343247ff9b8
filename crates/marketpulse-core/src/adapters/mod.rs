//! Upstream provider contracts and their network adapters.
//!
//! | Provider | Trait | Adapter |
//! |----------|-------|---------|
//! | Intraday chart | [`QuoteProvider`] | [`YahooChartAdapter`] |
//! | 24h ticker | [`TickerProvider`] | [`BinanceTickerAdapter`] |
//!
//! Adapters only translate transport and payload shape into [`UpstreamError`]
//! or validated domain values. Caching, timeouts, and degradation belong to
//! the [`crate::resolver`].

mod binance;
mod yahoo;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

pub use binance::BinanceTickerAdapter;
pub use yahoo::YahooChartAdapter;

use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::{InstrumentKey, RawQuote, TickerSnapshot, ValidationError};

/// Upstream failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Unavailable,
    Malformed,
    Timeout,
}

/// Structured upstream error consumed by the fallback resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    kind: UpstreamErrorKind,
    message: String,
    retryable: bool,
}

impl UpstreamError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Timeout,
            message: message.into(),
            retryable: true,
        }
    }

    pub(crate) fn from_transport(provider: &str, error: &HttpError) -> Self {
        let message = format!("{provider} transport error: {error}");
        if error.is_timeout() {
            Self::timeout(message)
        } else {
            Self::unavailable(message)
        }
    }

    pub(crate) fn from_validation(provider: &str, error: &ValidationError) -> Self {
        Self::malformed(format!("{provider} returned invalid values: {error}"))
    }

    pub const fn kind(&self) -> UpstreamErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            UpstreamErrorKind::Unavailable => "upstream.unavailable",
            UpstreamErrorKind::Malformed => "upstream.malformed",
            UpstreamErrorKind::Timeout => "upstream.timeout",
        }
    }
}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for UpstreamError {}

/// Chart provider: current value, previous close, and intraday series for one symbol.
pub trait QuoteProvider: Send + Sync {
    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a InstrumentKey,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, UpstreamError>> + Send + 'a>>;
}

/// Ticker provider: 24h statistics for a set of pairs in one batched call.
///
/// Implementations may return fewer snapshots than requested; pairs missing
/// from the response are treated as failed by the caller.
pub trait TickerProvider: Send + Sync {
    fn fetch_tickers<'a>(
        &'a self,
        pairs: &'a [InstrumentKey],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TickerSnapshot>, UpstreamError>> + Send + 'a>>;
}

/// Execute `request` and return the body of a 2xx response.
pub(crate) async fn fetch_body(
    http_client: &dyn HttpClient,
    request: HttpRequest,
    provider: &str,
) -> Result<String, UpstreamError> {
    let response = http_client
        .execute(request)
        .await
        .map_err(|error| UpstreamError::from_transport(provider, &error))?;

    if !response.is_success() {
        return Err(UpstreamError::unavailable(format!(
            "{provider} upstream returned status {}",
            response.status
        )));
    }

    Ok(response.body)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

    /// Records every request and replays one scripted response.
    pub(crate) struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        pub(crate) fn responding(response: HttpResponse) -> Self {
            Self {
                response: Ok(response),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(error: HttpError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }
}
