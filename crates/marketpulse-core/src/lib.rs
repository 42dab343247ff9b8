//! # MarketPulse Core
//!
//! Market data aggregation and resilience engine for the MarketPulse toolkit.
//!
//! ## Overview
//!
//! This crate fetches market state from unreliable upstream providers and
//! always returns something plausible:
//!
//! - **Exchange snapshots** with session state, index value, sentiment, and sparkline
//! - **Crypto board** from one batched 24h ticker call
//! - **Simulated movers** board for equity dispersion
//! - **Country activity** heatmap and a geolocated hot-events feed
//! - **AI augmentation** for headline sentiment, pattern scans, and chat
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`activity`] | Country activity heatmap and hot events |
//! | [`adapters`] | Upstream provider contracts and adapters (Yahoo chart, Binance ticker) |
//! | [`aggregator`] | `MarketEngine` service |
//! | [`ai`] | Completion client, AI proxy, result schemas |
//! | [`cache`] | Shared TTL cache |
//! | [`config`] | Engine configuration and builder |
//! | [`domain`] | Domain models |
//! | [`entropy`] | Injectable random source |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | Percentage change, sentiment, heat score, recent window |
//! | [`movers`] | Simulated movers board |
//! | [`resolver`] | Live / stale / synthetic fallback resolution |
//! | [`session`] | Market session evaluation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marketpulse_core::EngineBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = EngineBuilder::new().with_env_credentials().build();
//!
//!     for exchange in engine.exchanges().await {
//!         println!("{} {} ({})", exchange.id, exchange.index_value, exchange.source);
//!     }
//!
//!     let nyse = engine.exchange("NYSE").await?;
//!     println!("NYSE open: {}", nyse.is_open);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  MarketEngine   │────▶│ AI Proxy         │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ FallbackResolver│────▶│ TTL Cache        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Quote / Ticker  │────▶│ HTTP Client      │
//! │ Providers       │     │ (reqwest/none)   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Upstream failures never reach the caller; they are absorbed by the
//! fallback tiers. The only aggregation error is an unknown exchange id:
//!
//! ```rust,ignore
//! use marketpulse_core::{EngineBuilder, EngineError};
//!
//! let engine = EngineBuilder::new().with_mock_mode().build();
//! match engine.exchange("NOPE").await {
//!     Err(EngineError::ExchangeNotFound { id }) => eprintln!("unknown exchange {id}"),
//!     Err(other) => eprintln!("{other}"),
//!     Ok(snapshot) => println!("{}", snapshot.index_value),
//! }
//! ```
//!
//! ## Security
//!
//! - The completion key is read from environment variables only and never logged
//! - Input validation on instrument keys, session windows, and timezones

pub mod activity;
pub mod adapters;
pub mod aggregator;
pub mod ai;
pub mod cache;
pub mod config;
pub mod domain;
pub mod entropy;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod movers;
pub mod resolver;
pub mod session;

// Heatmap and events
pub use activity::{CountryActivity, HotEvent};

// Adapter implementations
pub use adapters::{
    BinanceTickerAdapter, QuoteProvider, TickerProvider, UpstreamError, UpstreamErrorKind,
    YahooChartAdapter,
};

// Engine service
pub use aggregator::MarketEngine;

// AI augmentation
pub use ai::{
    AiAnalysis, AiProxy, ChatMessage, ChatRole, ChatTurn, CompletionClient, CompletionError,
    CompletionRequest, GroqCompletionClient, MarketContext, Pattern, PatternScan,
    SentimentAnalysis,
};

// Caching
pub use cache::{CacheEntry, TtlCache};

// Configuration
pub use config::{EngineBuilder, EngineConfig};

// Domain models
pub use domain::{
    CryptoAsset, CryptoQuote, ExchangeCatalog, ExchangeDescriptor, ExchangeSnapshot,
    InstrumentKey, MarketMover, QuotePayload, QuoteSource, RawQuote, SentimentPolarity,
    TickerSnapshot, RECENT_WINDOW_LEN,
};

// Randomness
pub use entropy::{FastRandSource, RandomSource};

// Error types
pub use error::{CoreError, EngineError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Fallback resolution
pub use resolver::FallbackResolver;

// Session evaluation
pub use session::SessionWindow;
