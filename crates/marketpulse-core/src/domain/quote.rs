use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Maximum number of trailing intraday values kept in a [`QuotePayload`].
pub const RECENT_WINDOW_LEN: usize = 24;

/// Discrete classification derived from percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentPolarity {
    Positive,
    MildPositive,
    Neutral,
    MildNegative,
    Negative,
}

impl SentimentPolarity {
    pub const ALL: [Self; 5] = [
        Self::Positive,
        Self::MildPositive,
        Self::Neutral,
        Self::MildNegative,
        Self::Negative,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::MildPositive => "mild_positive",
            Self::Neutral => "neutral",
            Self::MildNegative => "mild_negative",
            Self::Negative => "negative",
        }
    }
}

impl Display for SentimentPolarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fallback tier produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Live,
    Stale,
    Synthetic,
}

impl QuoteSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Stale => "stale",
            Self::Synthetic => "synthetic",
        }
    }
}

impl Display for QuoteSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote as returned by a chart provider, before any derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub current_value: f64,
    pub previous_close: f64,
    /// Intraday values in chronological order.
    pub series: Vec<f64>,
}

impl RawQuote {
    pub fn new(
        current_value: f64,
        previous_close: f64,
        series: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        validate_finite("current_value", current_value)?;
        validate_finite("previous_close", previous_close)?;
        if series.iter().any(|value| !value.is_finite()) {
            return Err(ValidationError::NonFiniteValue { field: "series" });
        }

        Ok(Self {
            current_value,
            previous_close,
            series,
        })
    }
}

/// Derived per-instrument market state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    pub current_value: f64,
    pub previous_close: f64,
    pub percentage_change: f64,
    pub sentiment_polarity: SentimentPolarity,
    pub heat_score: u8,
    pub recent_window: Vec<f64>,
    pub source: QuoteSource,
}

impl QuotePayload {
    pub fn with_source(mut self, source: QuoteSource) -> Self {
        self.source = source;
        self
    }

    /// Index value as displayed by consumers: fixed two decimals.
    pub fn display_value(&self) -> String {
        format!("{:.2}", self.current_value)
    }
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_quote_rejects_non_finite_series() {
        let err = RawQuote::new(10.0, 9.0, vec![1.0, f64::NAN]).expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "series" });
    }

    #[test]
    fn polarity_serializes_as_snake_case() {
        let json = serde_json::to_string(&SentimentPolarity::MildNegative).expect("serialize");
        assert_eq!(json, "\"mild_negative\"");
    }

    #[test]
    fn display_value_uses_two_decimals() {
        let payload = QuotePayload {
            current_value: 5123.456,
            previous_close: 5100.0,
            percentage_change: 0.46,
            sentiment_polarity: SentimentPolarity::MildPositive,
            heat_score: 70,
            recent_window: Vec::new(),
            source: QuoteSource::Live,
        };
        assert_eq!(payload.display_value(), "5123.46");
    }
}
