//! # Domain Models
//!
//! Canonical types for aggregated market state.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InstrumentKey`] | Upstream-namespaced instrument identifier |
//! | [`ExchangeDescriptor`] | Static exchange configuration |
//! | [`ExchangeCatalog`] | Validated exchange list loaded at startup |
//! | [`RawQuote`] | Chart provider output before derivation |
//! | [`QuotePayload`] | Derived quote with sentiment, heat score, and sparkline |
//! | [`TickerSnapshot`] | 24h ticker statistics for a crypto pair |
//! | [`ExchangeSnapshot`] | Per-exchange aggregate served to consumers |
//!
//! Constructors validate finiteness of numeric inputs; upstream data that
//! fails validation is treated as malformed by the adapters.

mod crypto;
mod exchange;
mod instrument;
mod quote;
mod snapshot;

pub use crypto::{CryptoAsset, CryptoQuote, TickerSnapshot};
pub use exchange::{ExchangeCatalog, ExchangeDescriptor};
pub use instrument::InstrumentKey;
pub use quote::{QuotePayload, QuoteSource, RawQuote, SentimentPolarity, RECENT_WINDOW_LEN};
pub use snapshot::{ExchangeSnapshot, MarketMover};
