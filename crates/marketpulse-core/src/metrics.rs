//! Derived analytics computed from a raw quote.
//!
//! | Metric | Rule |
//! |--------|------|
//! | percentage change | `round2((current - prev) / prev * 100)` when `prev > 0`, else `0` |
//! | sentiment | `> 1` positive, `> 0` mild positive, `< -1` negative, `< 0` mild negative, else neutral |
//! | heat score | random within the sentiment bucket's sub-range, neutral fixed at 50 |
//! | recent window | trailing [`RECENT_WINDOW_LEN`] values, chronological, never padded |

use std::ops::Range;

use crate::entropy::RandomSource;
use crate::{QuotePayload, QuoteSource, RawQuote, SentimentPolarity, RECENT_WINDOW_LEN};

const NEUTRAL_HEAT: u8 = 50;

pub fn percentage_change(current: f64, previous_close: f64) -> f64 {
    if previous_close > 0.0 {
        round2((current - previous_close) / previous_close * 100.0)
    } else {
        0.0
    }
}

/// Thresholds are evaluated in order; the first match wins.
pub fn classify(percentage_change: f64) -> SentimentPolarity {
    if percentage_change > 1.0 {
        SentimentPolarity::Positive
    } else if percentage_change > 0.0 {
        SentimentPolarity::MildPositive
    } else if percentage_change < -1.0 {
        SentimentPolarity::Negative
    } else if percentage_change < 0.0 {
        SentimentPolarity::MildNegative
    } else {
        SentimentPolarity::Neutral
    }
}

/// Half-open heat-score range for a bucket.
pub fn heat_range(polarity: SentimentPolarity) -> Range<u8> {
    match polarity {
        SentimentPolarity::Positive => 80..100,
        SentimentPolarity::MildPositive => 60..80,
        SentimentPolarity::Neutral => NEUTRAL_HEAT..NEUTRAL_HEAT + 1,
        SentimentPolarity::MildNegative => 20..40,
        SentimentPolarity::Negative => 0..20,
    }
}

pub fn heat_score(polarity: SentimentPolarity, random: &dyn RandomSource) -> u8 {
    if polarity == SentimentPolarity::Neutral {
        return NEUTRAL_HEAT;
    }

    let range = heat_range(polarity);
    let sample = random.uniform(f64::from(range.start), f64::from(range.end));
    // Clamp guards float rounding at the open upper bound.
    (sample.floor() as u8).clamp(range.start, range.end - 1)
}

pub fn recent_window(series: &[f64]) -> Vec<f64> {
    let start = series.len().saturating_sub(RECENT_WINDOW_LEN);
    series[start..].to_vec()
}

/// Turn a provider quote into a live [`QuotePayload`].
pub fn derive(raw: &RawQuote, random: &dyn RandomSource) -> QuotePayload {
    let percentage_change = percentage_change(raw.current_value, raw.previous_close);
    let sentiment_polarity = classify(percentage_change);

    QuotePayload {
        current_value: raw.current_value,
        previous_close: raw.previous_close,
        percentage_change,
        sentiment_polarity,
        heat_score: heat_score(sentiment_polarity, random),
        recent_window: recent_window(&raw.series),
        source: QuoteSource::Live,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Collapse -0.0 so the sign always agrees with the neutral bucket.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::FastRandSource;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn change_sign_follows_current_against_previous_close(
            current in 0.0f64..1.0e6,
            previous_close in 0.01f64..1.0e6,
        ) {
            let change = percentage_change(current, previous_close);
            if change > 0.0 {
                prop_assert!(current > previous_close);
            } else if change < 0.0 {
                prop_assert!(current < previous_close);
            }
            if current > previous_close * 1.0001 {
                prop_assert!(change > 0.0);
            } else if current < previous_close * 0.9999 {
                prop_assert!(change < 0.0);
            }
        }

        #[test]
        fn round2_never_yields_negative_zero(value in -1.0f64..1.0) {
            let rounded = round2(value);
            prop_assert!(rounded != 0.0 || rounded.is_sign_positive());
        }

        #[test]
        fn recent_window_keeps_the_trailing_values(
            series in proptest::collection::vec(-1.0e4f64..1.0e4, 0..64),
        ) {
            let window = recent_window(&series);
            let expected = series.len().min(RECENT_WINDOW_LEN);
            prop_assert_eq!(window.len(), expected);
            prop_assert_eq!(&window[..], &series[series.len() - expected..]);
        }

        #[test]
        fn heat_score_stays_in_bucket_range(seed in any::<u64>(), bucket in 0usize..5) {
            let polarity = SentimentPolarity::ALL[bucket];
            let random = FastRandSource::seeded(seed);
            let heat = heat_score(polarity, &random);
            prop_assert!(heat <= 100);
            prop_assert!(heat_range(polarity).contains(&heat), "{} heat {}", polarity, heat);
        }

        #[test]
        fn sentiment_agrees_with_change_sign(change in -10.0f64..10.0) {
            let change = round2(change);
            let polarity = classify(change);
            match polarity {
                SentimentPolarity::Positive | SentimentPolarity::MildPositive => prop_assert!(change > 0.0),
                SentimentPolarity::Negative | SentimentPolarity::MildNegative => prop_assert!(change < 0.0),
                SentimentPolarity::Neutral => prop_assert_eq!(change, 0.0),
            }
        }
    }

    #[test]
    fn percentage_change_rounds_to_two_decimals() {
        assert_eq!(percentage_change(101.2345, 100.0), 1.23);
        assert_eq!(percentage_change(98.7612, 100.0), -1.24);
        assert_eq!(percentage_change(100.0, 0.0), 0.0);
        assert_eq!(percentage_change(100.0, -5.0), 0.0);
    }

    #[test]
    fn tiny_moves_round_to_unsigned_zero() {
        let change = percentage_change(99.9999, 100.0);
        assert_eq!(change, 0.0);
        assert!(change.is_sign_positive());
        assert_eq!(classify(change), SentimentPolarity::Neutral);
    }

    #[test]
    fn classification_thresholds_are_exclusive() {
        assert_eq!(classify(1.01), SentimentPolarity::Positive);
        assert_eq!(classify(1.0), SentimentPolarity::MildPositive);
        assert_eq!(classify(0.01), SentimentPolarity::MildPositive);
        assert_eq!(classify(0.0), SentimentPolarity::Neutral);
        assert_eq!(classify(-0.01), SentimentPolarity::MildNegative);
        assert_eq!(classify(-1.0), SentimentPolarity::MildNegative);
        assert_eq!(classify(-1.01), SentimentPolarity::Negative);
    }

    #[test]
    fn neutral_heat_is_fixed() {
        let random = FastRandSource::seeded(1);
        assert_eq!(heat_score(SentimentPolarity::Neutral, &random), 50);
    }

    #[test]
    fn recent_window_truncates_without_padding() {
        let series: Vec<f64> = (0..30).map(f64::from).collect();
        let window = recent_window(&series);
        assert_eq!(window.len(), RECENT_WINDOW_LEN);
        assert_eq!(window.first(), Some(&6.0));
        assert_eq!(window.last(), Some(&29.0));

        let short = [3.0, 1.0, 2.0];
        assert_eq!(recent_window(&short), vec![3.0, 1.0, 2.0]);
        assert!(recent_window(&[]).is_empty());
    }

    #[test]
    fn derive_tags_live_and_keeps_sign_agreement() {
        let random = FastRandSource::seeded(3);
        let raw = RawQuote::new(4_950.0, 5_000.0, vec![5_000.0, 4_975.0, 4_950.0])
            .expect("valid raw quote");

        let payload = derive(&raw, &random);

        assert_eq!(payload.source, QuoteSource::Live);
        assert_eq!(payload.percentage_change, -1.0);
        assert_eq!(payload.sentiment_polarity, SentimentPolarity::MildNegative);
        assert!(heat_range(SentimentPolarity::MildNegative).contains(&payload.heat_score));
        assert_eq!(payload.recent_window, raw.series);
    }
}
