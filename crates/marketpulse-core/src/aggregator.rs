//! Engine service: aggregates exchanges, crypto, movers, and AI over one
//! shared resolver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::activity::{self, CountryActivity, HotEvent};
use crate::adapters::{QuoteProvider, TickerProvider};
use crate::ai::{
    AiProxy, ChatMessage, ChatTurn, CryptoContext, ExchangeContext, MarketContext, MoverContext,
    PatternScan, SentimentAnalysis,
};
use crate::config::EngineConfig;
use crate::movers::MoverBoard;
use crate::resolver::FallbackResolver;
use crate::{
    CryptoAsset, CryptoQuote, EngineError, ExchangeCatalog, ExchangeDescriptor, ExchangeSnapshot,
    InstrumentKey, MarketMover,
};

const CONTEXT_MOVERS: usize = 6;
const CONTEXT_CRYPTO: usize = 5;

/// Market state aggregator. Cheap to clone; clones share cache and providers.
#[derive(Clone)]
pub struct MarketEngine {
    catalog: Arc<ExchangeCatalog>,
    quotes: Arc<dyn QuoteProvider>,
    tickers: Arc<dyn TickerProvider>,
    resolver: FallbackResolver,
    assets: Arc<[CryptoAsset]>,
    movers: Arc<MoverBoard>,
    ai: AiProxy,
    config: EngineConfig,
}

impl MarketEngine {
    pub(crate) fn from_parts(
        catalog: ExchangeCatalog,
        quotes: Arc<dyn QuoteProvider>,
        tickers: Arc<dyn TickerProvider>,
        resolver: FallbackResolver,
        ai: AiProxy,
        config: EngineConfig,
    ) -> Self {
        let movers = MoverBoard::seeded(resolver.random());
        Self {
            catalog: Arc::new(catalog),
            quotes,
            tickers,
            resolver,
            assets: CryptoAsset::tracked().into(),
            movers: Arc::new(movers),
            ai,
            config,
        }
    }

    pub fn catalog(&self) -> &ExchangeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &FallbackResolver {
        &self.resolver
    }

    pub fn ai(&self) -> &AiProxy {
        &self.ai
    }

    pub fn tracked_assets(&self) -> &[CryptoAsset] {
        &self.assets
    }

    /// Every catalog exchange, resolved concurrently, in catalog order.
    pub async fn exchanges(&self) -> Vec<ExchangeSnapshot> {
        self.exchanges_at(Utc::now()).await
    }

    pub async fn exchanges_at(&self, now: DateTime<Utc>) -> Vec<ExchangeSnapshot> {
        join_all(
            self.catalog
                .iter()
                .map(|descriptor| self.snapshot(descriptor, now)),
        )
        .await
    }

    /// One exchange by id; the only aggregation call that can fail.
    pub async fn exchange(&self, id: &str) -> Result<ExchangeSnapshot, EngineError> {
        self.exchange_at(id, Utc::now()).await
    }

    pub async fn exchange_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<ExchangeSnapshot, EngineError> {
        let descriptor = self.lookup(id)?;
        Ok(self.snapshot(descriptor, now).await)
    }

    async fn snapshot(&self, descriptor: &ExchangeDescriptor, now: DateTime<Utc>) -> ExchangeSnapshot {
        let key = &descriptor.upstream_symbol;
        let quote = self.resolver.resolve(key, self.quotes.fetch_quote(key)).await;
        ExchangeSnapshot::new(descriptor, descriptor.is_open_at(now), quote)
    }

    fn lookup(&self, id: &str) -> Result<&ExchangeDescriptor, EngineError> {
        self.catalog
            .get(id)
            .ok_or_else(|| EngineError::ExchangeNotFound { id: id.to_owned() })
    }

    /// Tracked crypto pairs from one batched ticker call, tiered per pair.
    pub async fn crypto_board(&self) -> Vec<CryptoQuote> {
        let pairs: Vec<InstrumentKey> = self.assets.iter().map(|asset| asset.pair.clone()).collect();
        self.resolver
            .resolve_tickers(&self.assets, self.tickers.fetch_tickers(&pairs))
            .await
    }

    pub fn market_movers(&self) -> Vec<MarketMover> {
        self.movers.draw(self.resolver.random())
    }

    /// Heatmap scores per country code, redrawn on every call.
    pub fn country_activity(&self) -> CountryActivity {
        activity::country_activity(self.resolver.random())
    }

    pub fn hot_events(&self) -> Vec<HotEvent> {
        activity::hot_events()
    }

    /// Sentiment for one headline, optionally grounded on an exchange's current state.
    pub async fn sentiment(
        &self,
        headline: &str,
        exchange_id: Option<&str>,
    ) -> Result<SentimentAnalysis, EngineError> {
        let context = match exchange_id {
            Some(id) => Some(self.exchange(id).await?),
            None => None,
        };
        Ok(self.ai.sentiment(headline, context.as_ref()).await)
    }

    pub async fn scan_patterns(&self, headlines: &[String]) -> PatternScan {
        self.ai.scan_patterns(headlines).await
    }

    pub async fn chat(&self, history: &[ChatMessage]) -> ChatTurn {
        if !self.ai.is_configured() {
            return self.ai.chat(history, &MarketContext::default()).await;
        }
        let context = self.market_context().await;
        self.ai.chat(history, &context).await
    }

    /// Snapshot of aggregated state used to ground the chat assistant.
    pub async fn market_context(&self) -> MarketContext {
        let now = Utc::now();
        let exchanges = join_all(
            self.catalog
                .iter()
                .take(self.config.chat_context_exchanges)
                .map(|descriptor| self.snapshot(descriptor, now)),
        )
        .await;

        MarketContext {
            exchanges: exchanges.iter().map(ExchangeContext::from).collect(),
            movers: self
                .market_movers()
                .iter()
                .take(CONTEXT_MOVERS)
                .map(MoverContext::from)
                .collect(),
            crypto: self
                .assets
                .iter()
                .take(CONTEXT_CRYPTO)
                .map(CryptoContext::from)
                .collect(),
        }
    }
}
