//! Three-tier fallback resolution: live, stale cache, synthetic.
//!
//! 1. A fresh cache entry is returned as stored, without touching the upstream.
//! 2. Otherwise the upstream call runs under a fixed timeout. Success is
//!    derived, cached, and returned tagged `live`.
//! 3. On failure any existing entry, however old, is returned tagged `stale`.
//! 4. With no entry at all a synthetic payload is generated and returned
//!    tagged `synthetic`. Synthetic payloads are never written to the cache,
//!    so the next request retries the upstream.
//!
//! Resolution never fails. Concurrent misses on one key may each call the
//! upstream; the last successful write wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::UpstreamError;
use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::entropy::RandomSource;
use crate::metrics::{self, round2};
use crate::{
    CryptoAsset, CryptoQuote, InstrumentKey, QuotePayload, QuoteSource, RawQuote, TickerSnapshot,
};

const SYNTHETIC_BASE: (f64, f64) = (5_000.0, 15_000.0);
const SYNTHETIC_CHANGE_PCT: (f64, f64) = (-2.0, 2.0);

/// Cache-backed resolver shared by every request of one engine.
#[derive(Clone)]
pub struct FallbackResolver {
    quotes: TtlCache<QuotePayload>,
    tickers: TtlCache<TickerSnapshot>,
    ttl: Duration,
    quote_timeout: Duration,
    ticker_timeout: Duration,
    random: Arc<dyn RandomSource>,
}

impl FallbackResolver {
    /// Freshness window and upstream deadlines are taken from `config`.
    pub fn new(config: &EngineConfig, random: Arc<dyn RandomSource>) -> Self {
        Self {
            quotes: TtlCache::new(),
            tickers: TtlCache::new(),
            ttl: config.cache_ttl,
            quote_timeout: config.quote_timeout,
            ticker_timeout: config.ticker_timeout,
            random,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn quote_timeout(&self) -> Duration {
        self.quote_timeout
    }

    pub fn ticker_timeout(&self) -> Duration {
        self.ticker_timeout
    }

    pub fn quote_cache(&self) -> &TtlCache<QuotePayload> {
        &self.quotes
    }

    pub fn ticker_cache(&self) -> &TtlCache<TickerSnapshot> {
        &self.tickers
    }

    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    /// Resolve one instrument. `fetch` is only polled on a cache miss or expiry.
    pub async fn resolve<F>(&self, key: &InstrumentKey, fetch: F) -> QuotePayload
    where
        F: Future<Output = Result<RawQuote, UpstreamError>>,
    {
        if let Some(payload) = self.quotes.get_fresh(key, self.ttl).await {
            debug!(key = %key, source = %payload.source, "serving fresh cache entry");
            return payload;
        }

        match bounded(self.quote_timeout, fetch).await {
            Ok(raw) => {
                let payload = metrics::derive(&raw, self.random.as_ref());
                debug!(key = %key, change = payload.percentage_change, "refreshed from upstream");
                self.quotes.put(key.clone(), payload.clone()).await;
                payload
            }
            Err(error) => self.degrade_quote(key, &error).await,
        }
    }

    async fn degrade_quote(&self, key: &InstrumentKey, error: &UpstreamError) -> QuotePayload {
        if let Some(entry) = self.quotes.get(key).await {
            warn!(
                key = %key,
                code = error.code(),
                error = error.message(),
                age_secs = entry.age().as_secs(),
                tier = "stale",
                "upstream failed, serving cached payload"
            );
            return entry.payload.with_source(QuoteSource::Stale);
        }

        warn!(
            key = %key,
            code = error.code(),
            error = error.message(),
            tier = "synthetic",
            "upstream failed with no cached payload, synthesizing"
        );
        self.synthesize()
    }

    /// A plausible payload classified through the live rules, with an empty sparkline.
    pub fn synthesize(&self) -> QuotePayload {
        let random = self.random.as_ref();
        let base = random.uniform(SYNTHETIC_BASE.0, SYNTHETIC_BASE.1);
        let change = round2(random.uniform(SYNTHETIC_CHANGE_PCT.0, SYNTHETIC_CHANGE_PCT.1));
        let current = base * (1.0 + change / 100.0);

        let percentage_change = metrics::percentage_change(current, base);
        let sentiment_polarity = metrics::classify(percentage_change);

        QuotePayload {
            current_value: current,
            previous_close: base,
            percentage_change,
            sentiment_polarity,
            heat_score: metrics::heat_score(sentiment_polarity, random),
            recent_window: Vec::new(),
            source: QuoteSource::Synthetic,
        }
    }

    /// Resolve a crypto board with one batched upstream call.
    ///
    /// Tiers apply per pair: when every pair is fresh no call is made, a
    /// pair missing from a successful response degrades on its own, and a
    /// failed call degrades every pair independently.
    pub async fn resolve_tickers<F>(&self, assets: &[CryptoAsset], fetch: F) -> Vec<CryptoQuote>
    where
        F: Future<Output = Result<Vec<TickerSnapshot>, UpstreamError>>,
    {
        let mut fresh = Vec::with_capacity(assets.len());
        for asset in assets {
            fresh.push(self.tickers.get_fresh(&asset.pair, self.ttl).await);
        }

        if fresh.iter().all(Option::is_some) {
            debug!(pairs = assets.len(), "serving crypto board from cache");
            return assets
                .iter()
                .zip(fresh.iter().flatten())
                .map(|(asset, snapshot)| CryptoQuote::from_snapshot(asset, snapshot, QuoteSource::Live))
                .collect();
        }

        let fetched = bounded(self.ticker_timeout, fetch).await;
        if let Ok(snapshots) = &fetched {
            debug!(received = snapshots.len(), "refreshed crypto board from upstream");
            for snapshot in snapshots {
                self.tickers.put(snapshot.pair.clone(), snapshot.clone()).await;
            }
        }

        let mut board = Vec::with_capacity(assets.len());
        for asset in assets {
            let live = fetched
                .as_ref()
                .ok()
                .and_then(|snapshots| snapshots.iter().find(|s| s.pair == asset.pair));

            let quote = match live {
                Some(snapshot) => CryptoQuote::from_snapshot(asset, snapshot, QuoteSource::Live),
                None => {
                    let error = match &fetched {
                        Err(error) => error.clone(),
                        Ok(_) => UpstreamError::malformed(format!(
                            "ticker response omitted {}",
                            asset.pair
                        )),
                    };
                    self.degrade_ticker(asset, &error).await
                }
            };
            board.push(quote);
        }
        board
    }

    async fn degrade_ticker(&self, asset: &CryptoAsset, error: &UpstreamError) -> CryptoQuote {
        if let Some(entry) = self.tickers.get(&asset.pair).await {
            // A still-fresh entry is real data; only an expired one is stale.
            let source = if entry.is_fresh(self.ttl) {
                QuoteSource::Live
            } else {
                QuoteSource::Stale
            };
            warn!(
                pair = %asset.pair,
                code = error.code(),
                error = error.message(),
                tier = %source,
                "ticker upstream failed, serving cached snapshot"
            );
            return CryptoQuote::from_snapshot(asset, &entry.payload, source);
        }

        warn!(
            pair = %asset.pair,
            code = error.code(),
            error = error.message(),
            tier = "synthetic",
            "ticker upstream failed with no cached snapshot, synthesizing"
        );
        let snapshot = self.synthesize_ticker(asset);
        CryptoQuote::from_snapshot(asset, &snapshot, QuoteSource::Synthetic)
    }

    /// A plausible 24h snapshot around the asset's reference price.
    pub fn synthesize_ticker(&self, asset: &CryptoAsset) -> TickerSnapshot {
        let random = self.random.as_ref();
        let change = round2(random.uniform(SYNTHETIC_CHANGE_PCT.0, SYNTHETIC_CHANGE_PCT.1));
        let last_price = asset.reference_usd * (1.0 + change / 100.0);

        TickerSnapshot {
            pair: asset.pair.clone(),
            last_price,
            change_percent_24h: change,
            volume_24h: random.uniform(1.0e6, 5.0e8).floor(),
            high_24h: last_price * (1.0 + random.uniform(0.0, 0.02)),
            low_24h: last_price * (1.0 - random.uniform(0.0, 0.02)),
        }
    }
}

/// Run `fetch` under `timeout`; an elapsed deadline becomes an upstream timeout.
pub async fn bounded<T, F>(timeout: Duration, fetch: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::timeout(format!(
            "upstream call exceeded {}ms",
            timeout.as_millis()
        ))),
    }
}
