//! Simulated equity movers board.
//!
//! No upstream backs this board: base prices are drawn once per engine and
//! every call draws a fresh daily change around them. Rows are always tagged
//! `synthetic`.

use crate::entropy::RandomSource;
use crate::metrics::round2;
use crate::{MarketMover, QuoteSource};

const CHANGE_PCT: (f64, f64) = (-4.0, 6.0);
const BASE_PRICE: (f64, f64) = (60.0, 460.0);
const VOLUME: (f64, f64) = (5.0e6, 85.0e6);

const UNIVERSE: &[(&str, &str, &str)] = &[
    ("AAPL", "Apple Inc.", "Technology"),
    ("MSFT", "Microsoft", "Technology"),
    ("NVDA", "NVIDIA", "Semiconductors"),
    ("TSLA", "Tesla", "Auto/EV"),
    ("META", "Meta Platforms", "Social Media"),
    ("AMZN", "Amazon", "E-Commerce"),
    ("GOOGL", "Alphabet", "Technology"),
    ("JPM", "JPMorgan Chase", "Finance"),
    ("NFLX", "Netflix", "Streaming"),
    ("AMD", "AMD", "Semiconductors"),
    ("RELIANCE", "Reliance Industries", "Conglomerate"),
    ("TCS", "TCS", "IT Services"),
];

#[derive(Debug, Clone, PartialEq)]
struct Listing {
    ticker: &'static str,
    name: &'static str,
    sector: &'static str,
    base_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoverBoard {
    listings: Vec<Listing>,
}

impl MoverBoard {
    pub fn seeded(random: &dyn RandomSource) -> Self {
        let listings = UNIVERSE
            .iter()
            .map(|&(ticker, name, sector)| Listing {
                ticker,
                name,
                sector,
                base_price: random.uniform(BASE_PRICE.0, BASE_PRICE.1),
            })
            .collect();
        Self { listings }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// One draw of the whole board, largest absolute move first.
    pub fn draw(&self, random: &dyn RandomSource) -> Vec<MarketMover> {
        let mut movers: Vec<MarketMover> = self
            .listings
            .iter()
            .map(|listing| {
                let change_pct = round2(random.uniform(CHANGE_PCT.0, CHANGE_PCT.1));
                MarketMover {
                    ticker: listing.ticker.to_owned(),
                    name: listing.name.to_owned(),
                    sector: listing.sector.to_owned(),
                    price: round2(listing.base_price * (1.0 + change_pct / 100.0)),
                    change_pct,
                    volume: random.uniform(VOLUME.0, VOLUME.1).floor() as u64,
                    source: QuoteSource::Synthetic,
                }
            })
            .collect();

        movers.sort_by(|a, b| b.change_pct.abs().total_cmp(&a.change_pct.abs()));
        movers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::FastRandSource;

    #[test]
    fn draw_is_sorted_by_absolute_change() {
        let random = FastRandSource::seeded(5);
        let board = MoverBoard::seeded(&random);

        for _ in 0..20 {
            let movers = board.draw(&random);
            assert_eq!(movers.len(), board.len());
            assert!(movers
                .windows(2)
                .all(|pair| pair[0].change_pct.abs() >= pair[1].change_pct.abs()));
        }
    }

    #[test]
    fn draws_stay_within_bounds() {
        let random = FastRandSource::seeded(8);
        let board = MoverBoard::seeded(&random);

        for mover in (0..50).flat_map(|_| board.draw(&random)) {
            assert!((-4.0..=6.0).contains(&mover.change_pct));
            assert!((5_000_000..85_000_000).contains(&mover.volume));
            assert!(mover.price > 0.0);
            assert_eq!(mover.source, QuoteSource::Synthetic);
        }
    }

    #[test]
    fn base_prices_are_stable_across_draws() {
        let random = FastRandSource::seeded(13);
        let board = MoverBoard::seeded(&random);

        let first = board.draw(&random);
        let second = board.draw(&random);
        let aapl = |movers: &[MarketMover]| {
            let row = movers.iter().find(|m| m.ticker == "AAPL").expect("listed");
            row.price / (1.0 + row.change_pct / 100.0)
        };
        assert!((aapl(&first) - aapl(&second)).abs() < 0.05);
    }
}
