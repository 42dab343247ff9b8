use thiserror::Error;

/// Validation and contract errors exposed by `marketpulse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument key cannot be empty")]
    EmptyInstrumentKey,
    #[error("instrument key length {len} exceeds max {max}")]
    InstrumentKeyTooLong { len: usize, max: usize },
    #[error("instrument key contains invalid character '{ch}' at index {index}")]
    InstrumentKeyInvalidChar { ch: char, index: usize },

    #[error("session time must be zero-padded 24-hour HH:MM: '{value}'")]
    InvalidSessionTime { value: String },
    #[error("session window closes before it opens: {open}-{close}")]
    InvertedSessionWindow { open: String, close: String },
    #[error("unknown IANA timezone '{value}'")]
    UnknownTimezone { value: String },

    #[error("exchange id cannot be empty")]
    EmptyExchangeId,
    #[error("exchange id '{id}' appears more than once in the catalog")]
    DuplicateExchangeId { id: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

/// Errors that reach a caller of the aggregation engine.
///
/// Upstream failures never appear here; they are absorbed by the fallback tiers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("exchange '{id}' not found")]
    ExchangeNotFound { id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("exchange catalog could not be loaded: {0}")]
    Catalog(String),

    #[error("exchange catalog '{path}' could not be read: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ExchangeNotFound { .. } => "engine.not_found",
            Self::Validation(_) => "engine.validation",
            Self::Catalog(_) => "engine.catalog",
            Self::CatalogIo { .. } => "engine.catalog_io",
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
