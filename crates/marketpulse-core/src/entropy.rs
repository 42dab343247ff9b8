//! Injectable randomness for heat scores and synthetic payloads.

use std::sync::{Mutex, PoisonError};

/// Source of uniformly distributed values.
///
/// Shared across concurrent requests, so implementations synchronize
/// internally.
pub trait RandomSource: Send + Sync {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&self) -> f64;

    /// Uniform sample in `[low, high)`.
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }
}

/// `fastrand`-backed random source; seedable for reproducible tests.
#[derive(Debug)]
pub struct FastRandSource {
    rng: Mutex<fastrand::Rng>,
}

impl FastRandSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for FastRandSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandSource {
    fn next_unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.f64()
    }
}
