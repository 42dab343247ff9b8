use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_KEY_LEN: usize = 24;

/// Upstream-namespaced identifier of a quoted instrument.
///
/// Exchange index tickers (`^GSPC`, `000001.SS`, `^NSEI`) and crypto pairs
/// (`BTCUSDT`) share this type. Keys are kept verbatim apart from trimming,
/// since upstream namespaces are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstrumentKey(String);

impl InstrumentKey {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyInstrumentKey);
        }

        let len = trimmed.chars().count();
        if len > MAX_KEY_LEN {
            return Err(ValidationError::InstrumentKeyTooLong {
                len,
                max: MAX_KEY_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '=' | '_');
            if !valid {
                return Err(ValidationError::InstrumentKeyInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a key from a compile-time constant without validation.
    /// Builtin tables are re-validated by `ExchangeCatalog::new`.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InstrumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for InstrumentKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for InstrumentKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<InstrumentKey> for String {
    fn from(value: InstrumentKey) -> Self {
        value.0
    }
}
