use serde::{Deserialize, Serialize};

use crate::{InstrumentKey, QuoteSource, ValidationError};

use super::quote::validate_finite;

/// A tracked crypto pair and its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoAsset {
    pub pair: InstrumentKey,
    pub symbol: String,
    pub name: String,
    /// Order-of-magnitude USD price used only to synthesize a plausible row.
    #[serde(default, skip_serializing)]
    pub reference_usd: f64,
}

impl CryptoAsset {
    /// Default tracked universe, quoted against USDT.
    pub fn tracked() -> Vec<Self> {
        TRACKED_PAIRS
            .iter()
            .map(|&(pair, symbol, name, reference_usd)| Self {
                pair: InstrumentKey::from_static(pair),
                symbol: symbol.to_owned(),
                name: name.to_owned(),
                reference_usd,
            })
            .collect()
    }
}

const TRACKED_PAIRS: &[(&str, &str, &str, f64)] = &[
    ("BTCUSDT", "BTC", "Bitcoin", 60_000.0),
    ("ETHUSDT", "ETH", "Ethereum", 3_000.0),
    ("SOLUSDT", "SOL", "Solana", 150.0),
    ("BNBUSDT", "BNB", "BNB", 550.0),
    ("XRPUSDT", "XRP", "XRP", 0.55),
    ("ADAUSDT", "ADA", "Cardano", 0.45),
    ("AVAXUSDT", "AVAX", "Avalanche", 35.0),
    ("LINKUSDT", "LINK", "Chainlink", 15.0),
    ("DOGEUSDT", "DOGE", "Dogecoin", 0.15),
    ("DOTUSDT", "DOT", "Polkadot", 7.0),
];

/// 24h rolling ticker statistics for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub pair: InstrumentKey,
    pub last_price: f64,
    pub change_percent_24h: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

impl TickerSnapshot {
    pub fn new(
        pair: InstrumentKey,
        last_price: f64,
        change_percent_24h: f64,
        volume_24h: f64,
        high_24h: f64,
        low_24h: f64,
    ) -> Result<Self, ValidationError> {
        validate_finite("last_price", last_price)?;
        validate_finite("change_percent_24h", change_percent_24h)?;
        validate_finite("volume_24h", volume_24h)?;
        validate_finite("high_24h", high_24h)?;
        validate_finite("low_24h", low_24h)?;

        Ok(Self {
            pair,
            last_price,
            change_percent_24h,
            volume_24h,
            high_24h,
            low_24h,
        })
    }
}

/// Crypto board row served to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoQuote {
    pub symbol: String,
    pub name: String,
    pub pair: InstrumentKey,
    pub usd: f64,
    #[serde(rename = "usd24hChange")]
    pub usd_24h_change: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    #[serde(rename = "high24h")]
    pub high_24h: f64,
    #[serde(rename = "low24h")]
    pub low_24h: f64,
    pub source: QuoteSource,
}

impl CryptoQuote {
    pub fn from_snapshot(asset: &CryptoAsset, snapshot: &TickerSnapshot, source: QuoteSource) -> Self {
        Self {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            pair: asset.pair.clone(),
            usd: snapshot.last_price,
            usd_24h_change: snapshot.change_percent_24h,
            volume_24h: snapshot.volume_24h,
            high_24h: snapshot.high_24h,
            low_24h: snapshot.low_24h,
            source,
        }
    }
}
