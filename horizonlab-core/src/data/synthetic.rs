//! Deterministic synthetic price series.
//!
//! Each symbol gets its own random walk, seeded from a BLAKE3 hash of the
//! symbol, so the same symbol always yields the same bars regardless of call
//! order or thread. Bars fall on weekdays starting 2020-01-02 and daily close
//! returns stay within ±3%.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, SeriesProvider};
use crate::domain::{Bar, PriceSeries};

const MAX_DAILY_MOVE: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProvider {
    bars: usize,
}

impl SyntheticProvider {
    pub fn new(bars: usize) -> Self {
        Self { bars }
    }

    pub fn bar_count(&self) -> usize {
        self.bars
    }

    /// Seed derived from the symbol alone.
    pub fn seed_for(symbol: &str) -> u64 {
        let hash = blake3::hash(symbol.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Generate the full walk for `symbol`.
    pub fn generate(&self, symbol: &str) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(symbol));
        let mut close: f64 = rng.gen_range(20.0..220.0);
        let mut day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap_or_default();
        let mut bars = Vec::with_capacity(self.bars);

        while bars.len() < self.bars {
            if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                day += Duration::days(1);
                continue;
            }

            let open = close;
            close = open * (1.0 + rng.gen_range(-MAX_DAILY_MOVE..=MAX_DAILY_MOVE));
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(100_000..5_000_000u64);
            let timestamp = day
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp())
                .unwrap_or_default();

            bars.push(Bar::new(timestamp, open, high, low, close, volume));
            day += Duration::days(1);
        }

        bars
    }
}

impl SeriesProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, start: i64, end: i64) -> Result<PriceSeries, DataError> {
        let bars = self
            .generate(symbol)
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect();
        Ok(PriceSeries::new(symbol, bars)?)
    }
}
