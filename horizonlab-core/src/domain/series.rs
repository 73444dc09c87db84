//! PriceSeries: the ordered bar sequence every engine consumes.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::{Bar, BarError};

/// Violations of the series invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamps must be strictly increasing: bar {index} ({timestamp}) follows {previous}")]
    NotIncreasing {
        index: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("invalid bar at index {index}: {source}")]
    InvalidBar {
        index: usize,
        #[source]
        source: BarError,
    },
}

/// Chronologically ordered daily bars for one symbol.
///
/// Invariants (checked by [`PriceSeries::new`]): timestamps strictly increase
/// and every bar passes [`Bar::validate`]. The series is fully materialized
/// before any indicator runs; there is no streaming append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|source| SeriesError::InvalidBar { index, source })?;
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NotIncreasing {
                    index,
                    timestamp: bar.timestamp,
                    previous: bars[index - 1].timestamp,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Sub-series over `range` (clamped to the series length).
    ///
    /// Any contiguous slice of a valid series is itself valid.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.bars.len());
        let start = range.start.min(end);
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[start..end].to_vec(),
        }
    }

    /// BLAKE3 hash over the symbol and every bar field, hex encoded.
    ///
    /// Two series with the same fingerprint produce identical reports.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(&bar.timestamp.to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn bar(i: i64, close: f64) -> Bar {
        Bar::new(1_704_153_600 + i * DAY, close, close + 1.0, close - 1.0, close, 1000)
    }

    #[test]
    fn accepts_ordered_bars() {
        let series = PriceSeries::new("TEST", vec![bar(0, 10.0), bar(1, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
        assert_eq!(series.last_close(), Some(11.0));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let err = PriceSeries::new("TEST", vec![bar(0, 10.0), bar(0, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::NotIncreasing { index: 1, .. }));
    }

    #[test]
    fn rejects_insane_bar() {
        let mut bad = bar(1, 11.0);
        bad.high = 5.0;
        let err = PriceSeries::new("TEST", vec![bar(0, 10.0), bad]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidBar { index: 1, .. }));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new("TEST", vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
    }

    #[test]
    fn slice_clamps_range() {
        let series =
            PriceSeries::new("TEST", (0..5).map(|i| bar(i, 10.0 + i as f64)).collect()).unwrap();
        assert_eq!(series.slice(1..3).closes(), vec![11.0, 12.0]);
        assert_eq!(series.slice(3..99).len(), 2);
        assert!(series.slice(7..9).is_empty());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = PriceSeries::new("TEST", vec![bar(0, 10.0), bar(1, 11.0)]).unwrap();
        let b = PriceSeries::new("TEST", vec![bar(0, 10.0), bar(1, 11.0)]).unwrap();
        let c = PriceSeries::new("TEST", vec![bar(0, 10.0), bar(1, 12.0)]).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
