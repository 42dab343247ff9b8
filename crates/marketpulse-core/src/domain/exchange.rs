use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::session::{self, SessionWindow};
use crate::{EngineError, InstrumentKey, ValidationError};

/// Static description of a listed exchange and the index it is tracked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDescriptor {
    pub id: String,
    pub name: String,
    pub country: String,
    pub index_name: String,
    /// IANA timezone name, e.g. `America/New_York`.
    pub timezone: String,
    pub currency: String,
    /// Local session open, zero-padded `HH:MM`.
    pub open_time: String,
    /// Local session close, zero-padded `HH:MM`.
    pub close_time: String,
    #[serde(alias = "yahoo_symbol")]
    pub upstream_symbol: InstrumentKey,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl ExchangeDescriptor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyExchangeId);
        }
        InstrumentKey::parse(self.upstream_symbol.as_str())?;
        self.tz()?;
        self.session_window()?;
        Ok(())
    }

    pub fn session_window(&self) -> Result<SessionWindow, ValidationError> {
        SessionWindow::parse(&self.open_time, &self.close_time)
    }

    pub fn tz(&self) -> Result<Tz, ValidationError> {
        session::parse_timezone(&self.timezone)
    }

    /// Whether the exchange is trading at `now`.
    ///
    /// Descriptors are validated when a catalog is built, so an unparseable
    /// timezone or window here reports the market as closed.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        match (self.tz(), self.session_window()) {
            (Ok(tz), Ok(window)) => session::is_open(tz, &window, now),
            _ => false,
        }
    }
}

/// Immutable, validated list of exchanges loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeCatalog {
    exchanges: Vec<ExchangeDescriptor>,
}

impl ExchangeCatalog {
    pub fn new(exchanges: Vec<ExchangeDescriptor>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(exchanges.len());
        for exchange in &exchanges {
            exchange.validate()?;
            if !seen.insert(exchange.id.as_str()) {
                return Err(ValidationError::DuplicateExchangeId {
                    id: exchange.id.clone(),
                });
            }
        }
        Ok(Self { exchanges })
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let exchanges: Vec<ExchangeDescriptor> =
            serde_json::from_str(json).map_err(|e| EngineError::Catalog(e.to_string()))?;
        Ok(Self::new(exchanges)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::CatalogIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: &str) -> Option<&ExchangeDescriptor> {
        self.exchanges
            .iter()
            .find(|exchange| exchange.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeDescriptor> {
        self.exchanges.iter()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for ExchangeCatalog {
    fn default() -> Self {
        Self {
            exchanges: BUILTIN_EXCHANGES.iter().map(BuiltinExchange::descriptor).collect(),
        }
    }
}

struct BuiltinExchange {
    id: &'static str,
    name: &'static str,
    country: &'static str,
    index_name: &'static str,
    timezone: &'static str,
    currency: &'static str,
    open_time: &'static str,
    close_time: &'static str,
    symbol: &'static str,
    latitude: f64,
    longitude: f64,
}

impl BuiltinExchange {
    fn descriptor(&self) -> ExchangeDescriptor {
        ExchangeDescriptor {
            id: self.id.to_owned(),
            name: self.name.to_owned(),
            country: self.country.to_owned(),
            index_name: self.index_name.to_owned(),
            timezone: self.timezone.to_owned(),
            currency: self.currency.to_owned(),
            open_time: self.open_time.to_owned(),
            close_time: self.close_time.to_owned(),
            upstream_symbol: InstrumentKey::from_static(self.symbol),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

const BUILTIN_EXCHANGES: &[BuiltinExchange] = &[
    BuiltinExchange {
        id: "NYSE",
        name: "New York Stock Exchange",
        country: "United States",
        index_name: "S&P 500",
        timezone: "America/New_York",
        currency: "$",
        open_time: "09:30",
        close_time: "16:00",
        symbol: "^GSPC",
        latitude: 40.7069,
        longitude: -74.0113,
    },
    BuiltinExchange {
        id: "NASDAQ",
        name: "Nasdaq",
        country: "United States",
        index_name: "NASDAQ Composite",
        timezone: "America/New_York",
        currency: "$",
        open_time: "09:30",
        close_time: "16:00",
        symbol: "^IXIC",
        latitude: 40.7569,
        longitude: -73.9860,
    },
    BuiltinExchange {
        id: "LSE",
        name: "London Stock Exchange",
        country: "United Kingdom",
        index_name: "FTSE 100",
        timezone: "Europe/London",
        currency: "£",
        open_time: "08:00",
        close_time: "16:30",
        symbol: "^FTSE",
        latitude: 51.5155,
        longitude: -0.0992,
    },
    BuiltinExchange {
        id: "FWB",
        name: "Frankfurt Stock Exchange",
        country: "Germany",
        index_name: "DAX",
        timezone: "Europe/Berlin",
        currency: "€",
        open_time: "09:00",
        close_time: "17:30",
        symbol: "^GDAXI",
        latitude: 50.1155,
        longitude: 8.6842,
    },
    BuiltinExchange {
        id: "EPA",
        name: "Euronext Paris",
        country: "France",
        index_name: "CAC 40",
        timezone: "Europe/Paris",
        currency: "€",
        open_time: "09:00",
        close_time: "17:30",
        symbol: "^FCHI",
        latitude: 48.8698,
        longitude: 2.3412,
    },
    BuiltinExchange {
        id: "TSE",
        name: "Tokyo Stock Exchange",
        country: "Japan",
        index_name: "Nikkei 225",
        timezone: "Asia/Tokyo",
        currency: "¥",
        open_time: "09:00",
        close_time: "15:30",
        symbol: "^N225",
        latitude: 35.6828,
        longitude: 139.7780,
    },
    BuiltinExchange {
        id: "SSE",
        name: "Shanghai Stock Exchange",
        country: "China",
        index_name: "SSE Composite",
        timezone: "Asia/Shanghai",
        currency: "¥",
        open_time: "09:30",
        close_time: "15:00",
        symbol: "000001.SS",
        latitude: 31.2397,
        longitude: 121.4998,
    },
    BuiltinExchange {
        id: "HKEX",
        name: "Hong Kong Stock Exchange",
        country: "Hong Kong",
        index_name: "Hang Seng",
        timezone: "Asia/Hong_Kong",
        currency: "HK$",
        open_time: "09:30",
        close_time: "16:00",
        symbol: "^HSI",
        latitude: 22.2833,
        longitude: 114.1588,
    },
    BuiltinExchange {
        id: "NSE",
        name: "National Stock Exchange of India",
        country: "India",
        index_name: "NIFTY 50",
        timezone: "Asia/Kolkata",
        currency: "₹",
        open_time: "09:15",
        close_time: "15:30",
        symbol: "^NSEI",
        latitude: 19.0600,
        longitude: 72.8600,
    },
    BuiltinExchange {
        id: "BSE",
        name: "Bombay Stock Exchange",
        country: "India",
        index_name: "SENSEX",
        timezone: "Asia/Kolkata",
        currency: "₹",
        open_time: "09:15",
        close_time: "15:30",
        symbol: "^BSESN",
        latitude: 18.9292,
        longitude: 72.8336,
    },
    BuiltinExchange {
        id: "ASX",
        name: "Australian Securities Exchange",
        country: "Australia",
        index_name: "S&P/ASX 200",
        timezone: "Australia/Sydney",
        currency: "A$",
        open_time: "10:00",
        close_time: "16:00",
        symbol: "^AXJO",
        latitude: -33.8688,
        longitude: 151.2093,
    },
    BuiltinExchange {
        id: "TSX",
        name: "Toronto Stock Exchange",
        country: "Canada",
        index_name: "S&P/TSX Composite",
        timezone: "America/Toronto",
        currency: "C$",
        open_time: "09:30",
        close_time: "16:00",
        symbol: "^GSPTSE",
        latitude: 43.6481,
        longitude: -79.3810,
    },
    BuiltinExchange {
        id: "KRX",
        name: "Korea Exchange",
        country: "South Korea",
        index_name: "KOSPI",
        timezone: "Asia/Seoul",
        currency: "₩",
        open_time: "09:00",
        close_time: "15:30",
        symbol: "^KS11",
        latitude: 37.5220,
        longitude: 126.9250,
    },
    BuiltinExchange {
        id: "B3",
        name: "B3 - Brasil Bolsa Balcão",
        country: "Brazil",
        index_name: "IBOVESPA",
        timezone: "America/Sao_Paulo",
        currency: "R$",
        open_time: "10:00",
        close_time: "17:00",
        symbol: "^BVSP",
        latitude: -23.5475,
        longitude: -46.6361,
    },
];
