//! Country activity heatmap and the hot-events feed.
//!
//! Neither is backed by an upstream. Activity scores sit on the same
//! `0..=100` scale as exchange heat scores and are redrawn on every call
//! from a per-country band; hot events are a fixed list of geolocated
//! headlines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entropy::RandomSource;

/// Activity score per ISO 3166-1 alpha-2 country code, ordered by code.
pub type CountryActivity = BTreeMap<String, u8>;

/// Countries with a dedicated band: `(code, floor, spread)`.
const BANDED: &[(&str, f64, f64)] = &[
    ("US", 60.0, 40.0),
    ("GB", 50.0, 35.0),
    ("DE", 45.0, 30.0),
    ("FR", 42.0, 28.0),
    ("JP", 55.0, 35.0),
    ("CN", 65.0, 30.0),
    ("HK", 50.0, 35.0),
    ("IN", 58.0, 35.0),
    ("AU", 45.0, 30.0),
    ("CA", 48.0, 28.0),
    ("KR", 50.0, 30.0),
    ("SG", 52.0, 28.0),
    ("BR", 35.0, 35.0),
    ("RU", 20.0, 25.0),
    ("SA", 40.0, 35.0),
    ("AE", 45.0, 30.0),
    ("ZA", 30.0, 30.0),
    ("MX", 35.0, 30.0),
    ("CH", 50.0, 20.0),
    ("NL", 48.0, 25.0),
    ("IT", 40.0, 28.0),
    ("ES", 38.0, 28.0),
    ("SE", 45.0, 22.0),
    ("NO", 48.0, 22.0),
    ("TH", 42.0, 28.0),
    ("ID", 38.0, 28.0),
    ("MY", 40.0, 25.0),
    ("TR", 30.0, 30.0),
    ("AR", 20.0, 20.0),
    ("NG", 25.0, 25.0),
    ("EG", 28.0, 22.0),
    ("PK", 22.0, 20.0),
    ("PL", 38.0, 22.0),
];

const BACKGROUND_BAND: (f64, f64) = (25.0, 30.0);

/// Every other country on the heatmap shares the background band.
const BACKGROUND: &[&str] = &[
    "AF", "AL", "DZ", "AO", "AM", "AZ", "BY", "BA", "BJ", "BT", "BO", "BW", "BF", "BI", "CM",
    "CF", "TD", "CL", "CO", "CG", "HR", "CU", "CY", "DK", "EC", "GH", "GT", "GN", "GW", "HN",
    "HU", "IS", "IR", "IQ", "IL", "CI", "JM", "JO", "KZ", "KE", "KW", "KG", "LA", "LV", "LB",
    "LT", "LU", "MG", "MW", "ML", "MT", "MR", "MU", "MN", "ME", "MA", "MZ", "MM", "NA", "NP",
    "NZ", "NI", "NE", "OM", "PS", "PA", "PG", "PE", "PH", "PT", "PR", "QA", "RE", "RO", "RW",
    "SN", "RS", "SL", "SK", "SI", "SO", "SS", "LK", "SD", "SR", "TJ", "TZ", "TL", "TN", "TM",
    "UG", "UA", "UY", "UZ", "VE", "VN", "YE", "ZM", "ZW", "FI", "BE", "AT", "CZ", "GR", "IE",
    "BD", "ET",
];

/// One draw of the whole heatmap.
pub fn country_activity(random: &dyn RandomSource) -> CountryActivity {
    let mut activity = CountryActivity::new();
    for &(code, floor, spread) in BANDED {
        activity.insert(code.to_owned(), draw(random, floor, spread));
    }
    for &code in BACKGROUND {
        activity
            .entry(code.to_owned())
            .or_insert_with(|| draw(random, BACKGROUND_BAND.0, BACKGROUND_BAND.1));
    }
    activity
}

fn draw(random: &dyn RandomSource, floor: f64, spread: f64) -> u8 {
    random
        .uniform(floor, floor + spread)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Geolocated headline for the globe overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotEvent {
    pub id: u32,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

const HOT_EVENTS: &[(u32, &str, f64, f64)] = &[
    (1, "Oil prices spike", 25.0, 45.0),
    (2, "RBI rate announcement", 19.076, 72.878),
    (3, "US CPI data release", 38.907, -77.04),
    (4, "Gold demand rising", -26.204, 28.047),
    (5, "Geopolitical tensions", 48.379, 31.166),
    (6, "ECB rate decision", 50.110, 8.682),
    (7, "China PMI data", 39.916, 116.40),
];

pub fn hot_events() -> Vec<HotEvent> {
    HOT_EVENTS
        .iter()
        .map(|&(id, title, latitude, longitude)| HotEvent {
            id,
            title: title.to_owned(),
            latitude,
            longitude,
        })
        .collect()
}
