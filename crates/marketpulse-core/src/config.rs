//! Engine configuration and builder.
//!
//! # Example
//!
//! ```rust,ignore
//! use marketpulse_core::EngineBuilder;
//!
//! // Live upstreams; completion key read from the environment.
//! let engine = EngineBuilder::new().with_env_credentials().build();
//!
//! // Offline: every instrument degrades to synthetic, AI serves demo payloads.
//! let offline = EngineBuilder::new().with_mock_mode().build();
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapters::{BinanceTickerAdapter, QuoteProvider, TickerProvider, YahooChartAdapter};
use crate::ai::{AiProxy, GroqCompletionClient, DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL};
use crate::cache::DEFAULT_TTL;
use crate::entropy::{FastRandSource, RandomSource};
use crate::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use crate::resolver::FallbackResolver;
use crate::{ExchangeCatalog, MarketEngine};

/// Tunables shared by every engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Freshness window for every cached quote and ticker.
    pub cache_ttl: Duration,
    pub quote_timeout: Duration,
    pub ticker_timeout: Duration,
    pub completion_timeout: Duration,
    /// Conversation turns forwarded to the completion service.
    pub chat_history_limit: usize,
    pub headline_limit: usize,
    pub chat_context_exchanges: usize,
    pub completion_model: String,
    pub completion_base_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            quote_timeout: Duration::from_secs(6),
            ticker_timeout: Duration::from_secs(5),
            completion_timeout: Duration::from_secs(30),
            chat_history_limit: 10,
            headline_limit: 10,
            chat_context_exchanges: 8,
            completion_model: String::from(DEFAULT_COMPLETION_MODEL),
            completion_base_url: String::from(DEFAULT_COMPLETION_BASE_URL),
        }
    }
}

/// Builder for [`MarketEngine`].
#[derive(Default)]
pub struct EngineBuilder {
    use_mock: bool,
    completion_api_key: Option<String>,
    catalog: Option<ExchangeCatalog>,
    config: EngineConfig,
    random: Option<Arc<dyn RandomSource>>,
    http_client: Option<Arc<dyn HttpClient>>,
    quote_provider: Option<Arc<dyn QuoteProvider>>,
    ticker_provider: Option<Arc<dyn TickerProvider>>,
    ai: Option<AiProxy>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the network transport with [`NoopHttpClient`] and leave AI unconfigured.
    pub fn with_mock_mode(mut self) -> Self {
        self.use_mock = true;
        self
    }

    /// Read the completion key from `MARKETPULSE_GROQ_API_KEY`, then `GROQ_API_KEY`.
    pub fn with_env_credentials(mut self) -> Self {
        self.completion_api_key = env::var("MARKETPULSE_GROQ_API_KEY")
            .or_else(|_| env::var("GROQ_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_completion_key(mut self, key: impl Into<String>) -> Self {
        self.completion_api_key = Some(key.into());
        self
    }

    pub fn with_catalog(mut self, catalog: ExchangeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Override the chart provider, bypassing the Yahoo adapter.
    pub fn with_quote_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.quote_provider = Some(provider);
        self
    }

    /// Override the ticker provider, bypassing the Binance adapter.
    pub fn with_ticker_provider(mut self, provider: Arc<dyn TickerProvider>) -> Self {
        self.ticker_provider = Some(provider);
        self
    }

    /// Override the AI proxy, e.g. with a scripted completion client.
    pub fn with_ai(mut self, ai: AiProxy) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn build(self) -> MarketEngine {
        let config = self.config;
        let http_client: Arc<dyn HttpClient> = match self.http_client {
            _ if self.use_mock => Arc::new(NoopHttpClient),
            Some(client) => client,
            None => Arc::new(ReqwestHttpClient::new()),
        };

        let quotes: Arc<dyn QuoteProvider> = match self.quote_provider {
            Some(provider) => provider,
            None => Arc::new(
                YahooChartAdapter::new(Arc::clone(&http_client)).with_timeout(config.quote_timeout),
            ),
        };
        let tickers: Arc<dyn TickerProvider> = match self.ticker_provider {
            Some(provider) => provider,
            None => Arc::new(
                BinanceTickerAdapter::new(Arc::clone(&http_client))
                    .with_timeout(config.ticker_timeout),
            ),
        };

        let ai = match (self.ai, self.completion_api_key) {
            (Some(ai), _) => ai,
            (None, Some(key)) if !self.use_mock => AiProxy::new(Arc::new(
                GroqCompletionClient::new(Arc::clone(&http_client), key)
                    .with_base_url(config.completion_base_url.clone())
                    .with_timeout(config.completion_timeout),
            )),
            (None, _) => AiProxy::unconfigured(),
        }
        .with_model(config.completion_model.clone())
        .with_limits(config.chat_history_limit, config.headline_limit)
        .with_timeout(config.completion_timeout);

        if !ai.is_configured() {
            info!("completion service not configured; AI endpoints will serve demo payloads");
        }

        let random: Arc<dyn RandomSource> = match self.random {
            Some(random) => random,
            None => Arc::new(FastRandSource::new()),
        };
        let resolver = FallbackResolver::new(&config, random);

        MarketEngine::from_parts(
            self.catalog.unwrap_or_default(),
            quotes,
            tickers,
            resolver,
            ai,
            config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.quote_timeout, Duration::from_secs(6));
        assert_eq!(config.ticker_timeout, Duration::from_secs(5));
        assert_eq!(config.chat_history_limit, 10);
        assert_eq!(config.completion_model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn mock_mode_never_configures_ai() {
        let engine = EngineBuilder::new()
            .with_completion_key("key")
            .with_mock_mode()
            .build();
        assert!(!engine.ai().is_configured());
        assert_eq!(engine.catalog().len(), ExchangeCatalog::default().len());
    }

    #[test]
    fn resolver_takes_ttl_and_deadlines_from_config() {
        let config = EngineConfig {
            cache_ttl: Duration::from_secs(30),
            quote_timeout: Duration::from_millis(750),
            ticker_timeout: Duration::from_millis(400),
            ..EngineConfig::default()
        };
        let engine = EngineBuilder::new().with_mock_mode().with_config(config).build();

        assert_eq!(engine.resolver().ttl(), Duration::from_secs(30));
        assert_eq!(engine.resolver().quote_timeout(), Duration::from_millis(750));
        assert_eq!(engine.resolver().ticker_timeout(), Duration::from_millis(400));
    }

    #[test]
    fn explicit_key_configures_ai() {
        let engine = EngineBuilder::new().with_completion_key("key").build();
        assert!(engine.ai().is_configured());
    }
}
