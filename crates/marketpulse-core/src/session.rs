//! Market session evaluation.
//!
//! Session state is never stored: it is recomputed from the exchange's
//! timezone, its local open/close window, and the current instant on every
//! request. Local time is resolved through the IANA database so DST
//! transitions move the window with the exchange's wall clock.

use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::ValidationError;

/// A validated local trading window in zero-padded `HH:MM` form.
///
/// Zero-padded 24-hour strings order lexicographically exactly as they
/// order numerically, so containment is a plain string comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionWindow {
    open: String,
    close: String,
}

impl SessionWindow {
    pub fn parse(open: &str, close: &str) -> Result<Self, ValidationError> {
        validate_clock(open)?;
        validate_clock(close)?;
        if close < open {
            return Err(ValidationError::InvertedSessionWindow {
                open: open.to_owned(),
                close: close.to_owned(),
            });
        }
        Ok(Self {
            open: open.to_owned(),
            close: close.to_owned(),
        })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// Inclusive on both ends.
    pub fn contains(&self, local_clock: &str) -> bool {
        self.open.as_str() <= local_clock && local_clock <= self.close.as_str()
    }
}

/// Whether a market in `tz` trading `window` local time is open at `now`.
pub fn is_open(tz: Tz, window: &SessionWindow, now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&tz);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    window.contains(&local_clock(tz, now))
}

/// Local wall-clock time of `now` in `tz` as zero-padded `HH:MM`.
pub fn local_clock(tz: Tz, now: DateTime<Utc>) -> String {
    // %H is 00..=23, so midnight is always 00:MM.
    now.with_timezone(&tz).format("%H:%M").to_string()
}

pub fn parse_timezone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimezone {
            value: name.to_owned(),
        })
}

fn validate_clock(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidSessionTime {
        value: value.to_owned(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(())
}
