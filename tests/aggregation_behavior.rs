//! Behavior-driven tests for multi-exchange aggregation.
//!
//! These tests verify HOW the engine fans out across a catalog, isolates
//! per-instrument failures, and reports unknown exchanges.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use marketpulse_core::{
    EngineBuilder, EngineConfig, EngineError, ExchangeCatalog, FastRandSource, InstrumentKey,
    MarketEngine, QuoteProvider, QuoteSource, RawQuote, TickerProvider, TickerSnapshot,
    UpstreamError,
};

// =============================================================================
// Fixtures
// =============================================================================

const CATALOG: &str = r#"[
  {"id": "ALPHA", "name": "Alpha Exchange", "country": "Testland", "index_name": "Alpha 50",
   "timezone": "Europe/London", "currency": "£", "open_time": "08:00", "close_time": "16:30",
   "upstream_symbol": "^ALPHA"},
  {"id": "BETA", "name": "Beta Exchange", "country": "Testland", "index_name": "Beta 100",
   "timezone": "Asia/Tokyo", "currency": "¥", "open_time": "09:00", "close_time": "15:30",
   "upstream_symbol": "^BETA"},
  {"id": "GAMMA", "name": "Gamma Exchange", "country": "Testland", "index_name": "Gamma Composite",
   "timezone": "America/New_York", "currency": "$", "open_time": "09:30", "close_time": "16:00",
   "upstream_symbol": "^GAMMA"}
]"#;

/// Every symbol answers except the ones listed as broken.
struct PartiallyBrokenQuotes {
    broken: HashSet<&'static str>,
    calls: AtomicUsize,
}

impl PartiallyBrokenQuotes {
    fn breaking(broken: &[&'static str]) -> Self {
        Self {
            broken: broken.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl QuoteProvider for PartiallyBrokenQuotes {
    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a InstrumentKey,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken.contains(symbol.as_str()) {
                return Err(UpstreamError::unavailable(format!("{symbol} is down")));
            }
            RawQuote::new(1_010.0, 1_000.0, vec![995.0, 1_002.0, 1_010.0])
                .map_err(|error| UpstreamError::malformed(error.to_string()))
        })
    }
}

/// One symbol never answers; every other one answers after `delay`.
struct SlowQuotes {
    hanging: &'static str,
    delay: Duration,
}

impl QuoteProvider for SlowQuotes {
    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a InstrumentKey,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            if symbol.as_str() == self.hanging {
                return std::future::pending().await;
            }
            tokio::time::sleep(self.delay).await;
            RawQuote::new(1_010.0, 1_000.0, vec![1_000.0, 1_010.0])
                .map_err(|error| UpstreamError::malformed(error.to_string()))
        })
    }
}

struct OfflineTickers;

impl TickerProvider for OfflineTickers {
    fn fetch_tickers<'a>(
        &'a self,
        _pairs: &'a [InstrumentKey],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TickerSnapshot>, UpstreamError>> + Send + 'a>>
    {
        Box::pin(async { Err(UpstreamError::unavailable("ticker feed offline")) })
    }
}

fn engine(quotes: Arc<PartiallyBrokenQuotes>) -> MarketEngine {
    EngineBuilder::new()
        .with_mock_mode()
        .with_catalog(ExchangeCatalog::from_json_str(CATALOG).expect("valid catalog"))
        .with_quote_provider(quotes)
        .with_ticker_provider(Arc::new(OfflineTickers))
        .with_random(Arc::new(FastRandSource::seeded(7)))
        .build()
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn when_one_upstream_fails_system_degrades_only_that_exchange() {
    // Given: three exchanges, one of which has a broken upstream
    let quotes = Arc::new(PartiallyBrokenQuotes::breaking(&["^BETA"]));
    let engine = engine(Arc::clone(&quotes));

    // When: every exchange is aggregated
    let snapshots = engine.exchanges().await;

    // Then: exactly one result is non-live, and it is the broken one
    let non_live: Vec<&str> = snapshots
        .iter()
        .filter(|snapshot| snapshot.source != QuoteSource::Live)
        .map(|snapshot| snapshot.id.as_str())
        .collect();
    assert_eq!(non_live, vec!["BETA"]);
    assert_eq!(quotes.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn when_one_upstream_hangs_system_waits_only_one_deadline() {
    // Given: BETA never answers, ALPHA and GAMMA answer after two seconds each
    let engine = EngineBuilder::new()
        .with_mock_mode()
        .with_catalog(ExchangeCatalog::from_json_str(CATALOG).expect("valid catalog"))
        .with_quote_provider(Arc::new(SlowQuotes {
            hanging: "^BETA",
            delay: Duration::from_secs(2),
        }))
        .with_ticker_provider(Arc::new(OfflineTickers))
        .with_random(Arc::new(FastRandSource::seeded(7)))
        .build();
    let deadline = engine.config().quote_timeout;

    // When: every exchange is aggregated
    let started = tokio::time::Instant::now();
    let snapshots = engine.exchanges().await;
    let elapsed = started.elapsed();

    // Then: the whole call costs one deadline, not the sum of every upstream
    assert!(elapsed >= deadline, "finished before the deadline: {elapsed:?}");
    assert!(
        elapsed < deadline + Duration::from_secs(1),
        "upstreams ran one after another: {elapsed:?}"
    );

    // And: only the hanging exchange degraded
    let sources: Vec<(&str, QuoteSource)> = snapshots
        .iter()
        .map(|snapshot| (snapshot.id.as_str(), snapshot.source))
        .collect();
    assert_eq!(
        sources,
        vec![
            ("ALPHA", QuoteSource::Live),
            ("BETA", QuoteSource::Synthetic),
            ("GAMMA", QuoteSource::Live),
        ]
    );
}

#[tokio::test]
async fn when_aggregating_system_preserves_catalog_order() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let ids: Vec<String> = engine
        .exchanges()
        .await
        .into_iter()
        .map(|snapshot| snapshot.id)
        .collect();

    assert_eq!(ids, vec!["ALPHA", "BETA", "GAMMA"]);
}

#[tokio::test]
async fn when_live_quote_resolves_system_renders_two_decimal_index_value() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let snapshot = engine.exchange("ALPHA").await.expect("known exchange");

    assert_eq!(snapshot.index_value, "1010.00");
    assert_eq!(snapshot.percentage_change, 1.0);
    assert_eq!(snapshot.sparkline, vec![995.0, 1_002.0, 1_010.0]);
    assert_eq!(snapshot.source, QuoteSource::Live);
}

#[tokio::test]
async fn when_all_upstreams_fail_system_still_returns_every_exchange() {
    // Given: every upstream broken
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[
        "^ALPHA", "^BETA", "^GAMMA",
    ])));

    // When: aggregated
    let snapshots = engine.exchanges().await;

    // Then: the result is complete and renderable
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots
        .iter()
        .all(|snapshot| snapshot.source == QuoteSource::Synthetic && snapshot.sparkline.is_empty()));
}

// =============================================================================
// Single exchange lookup
// =============================================================================

#[tokio::test]
async fn when_exchange_id_is_unknown_system_returns_not_found() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let error = engine.exchange("NOPE").await.expect_err("unknown id");

    assert!(matches!(error, EngineError::ExchangeNotFound { ref id } if id == "NOPE"));
    assert_eq!(error.code(), "engine.not_found");
}

#[tokio::test]
async fn when_exchange_id_differs_in_case_system_still_finds_it() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let snapshot = engine.exchange("gamma").await.expect("case-insensitive id");

    assert_eq!(snapshot.id, "GAMMA");
}

#[tokio::test]
async fn when_session_is_evaluated_system_uses_each_exchange_timezone() {
    // Given: Wednesday 2024-01-10 10:00 UTC (London 10:00, Tokyo 19:00, New York 05:00)
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();

    // When
    let snapshots = engine.exchanges_at(now).await;

    // Then: only London is trading
    let open: Vec<(&str, bool)> = snapshots
        .iter()
        .map(|snapshot| (snapshot.id.as_str(), snapshot.is_open))
        .collect();
    assert_eq!(open, vec![("ALPHA", true), ("BETA", false), ("GAMMA", false)]);
}

// =============================================================================
// Catalog loading
// =============================================================================

#[test]
fn when_catalog_repeats_an_id_system_rejects_it() {
    let doubled = r#"[
      {"id": "X", "name": "X", "country": "C", "index_name": "I", "timezone": "UTC",
       "currency": "$", "open_time": "09:00", "close_time": "17:00", "upstream_symbol": "^X"},
      {"id": "X", "name": "X2", "country": "C", "index_name": "I", "timezone": "UTC",
       "currency": "$", "open_time": "09:00", "close_time": "17:00", "upstream_symbol": "^X2"}
    ]"#;

    let error = ExchangeCatalog::from_json_str(doubled).expect_err("duplicate id");
    assert_eq!(error.code(), "engine.validation");
}

#[test]
fn when_catalog_names_unknown_timezone_system_rejects_it() {
    let bad = r#"[
      {"id": "X", "name": "X", "country": "C", "index_name": "I", "timezone": "Mars/Olympus",
       "currency": "$", "open_time": "09:00", "close_time": "17:00", "upstream_symbol": "^X"}
    ]"#;

    assert!(ExchangeCatalog::from_json_str(bad).is_err());
}

#[test]
fn builtin_catalog_is_valid() {
    let builtin = ExchangeCatalog::default();
    let rebuilt = ExchangeCatalog::new(builtin.iter().cloned().collect()).expect("valid builtin");
    assert_eq!(rebuilt.len(), 14);
    assert!(rebuilt.get("nyse").is_some());
}

// =============================================================================
// Crypto board and movers
// =============================================================================

#[tokio::test]
async fn when_ticker_feed_is_offline_system_synthesizes_every_pair() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let board = engine.crypto_board().await;

    assert_eq!(board.len(), engine.tracked_assets().len());
    assert!(board.iter().all(|row| row.source == QuoteSource::Synthetic));
    assert!(board.iter().all(|row| row.usd > 0.0));
}

#[tokio::test]
async fn when_movers_are_requested_system_returns_sorted_synthetic_board() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let movers = engine.market_movers();

    assert_eq!(movers.len(), 12);
    assert!(movers
        .windows(2)
        .all(|pair| pair[0].change_pct.abs() >= pair[1].change_pct.abs()));
    assert!(movers.iter().all(|row| row.source == QuoteSource::Synthetic));
}

#[test]
fn when_country_activity_is_requested_system_scores_every_country_on_the_heat_scale() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let first = engine.country_activity();
    let second = engine.country_activity();

    assert!(first.keys().eq(second.keys()));
    assert!(first.values().all(|&score| score <= 100));
    assert!((60..=100).contains(&first["US"]));
    assert!((20..=45).contains(&first["RU"]));
}

#[test]
fn when_hot_events_are_requested_system_returns_the_fixed_feed() {
    let engine = engine(Arc::new(PartiallyBrokenQuotes::breaking(&[])));

    let events = engine.hot_events();

    let ids: Vec<u32> = events.iter().map(|event| event.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(events[5].title, "ECB rate decision");
}

#[tokio::test]
async fn when_engine_is_cloned_system_shares_one_cache() {
    // Given: an engine and its clone
    let quotes = Arc::new(PartiallyBrokenQuotes::breaking(&[]));
    let engine = engine(Arc::clone(&quotes));
    let clone = engine.clone();

    // When: both aggregate within the TTL
    engine.exchanges().await;
    clone.exchanges().await;

    // Then: the upstream was hit once per instrument
    assert_eq!(quotes.calls.load(Ordering::SeqCst), 3);
    assert_eq!(clone.config().cache_ttl, EngineConfig::default().cache_ttl);
    assert_eq!(engine.resolver().ttl(), Duration::from_secs(120));
}
