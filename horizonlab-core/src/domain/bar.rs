//! Bar: one trading day of OHLCV data.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single trading day.
///
/// `timestamp` is in seconds since the Unix epoch. Bars are immutable once
/// they are part of a [`PriceSeries`](super::PriceSeries).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Reasons a bar fails the sanity check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar at {timestamp} has a non-finite price")]
    NonFinite { timestamp: i64 },

    #[error("bar at {timestamp} has a non-positive price")]
    NonPositive { timestamp: i64 },

    #[error("bar at {timestamp} violates low <= open,close <= high")]
    OutOfRange { timestamp: i64 },
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// UTC calendar date of the bar. `None` only for timestamps chrono cannot represent.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.date_naive())
    }

    /// OHLC sanity: finite, positive, `low <= open,close <= high`.
    pub fn validate(&self) -> Result<(), BarError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(BarError::NonFinite {
                timestamp: self.timestamp,
            });
        }
        if prices.iter().any(|&p| p <= 0.0) {
            return Err(BarError::NonPositive {
                timestamp: self.timestamp,
            });
        }
        if self.low > self.open
            || self.low > self.close
            || self.high < self.open
            || self.high < self.close
        {
            return Err(BarError::OutOfRange {
                timestamp: self.timestamp,
            });
        }
        Ok(())
    }

    pub fn is_sane(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        // 2024-01-02 00:00:00 UTC
        Bar::new(1_704_153_600, 100.0, 105.0, 98.0, 103.0, 50_000)
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_non_finite() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert_eq!(
            bar.validate(),
            Err(BarError::NonFinite {
                timestamp: bar.timestamp
            })
        );
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(matches!(bar.validate(), Err(BarError::OutOfRange { .. })));
    }

    #[test]
    fn bar_detects_non_positive() {
        let mut bar = sample_bar();
        bar.low = 0.0;
        assert!(matches!(bar.validate(), Err(BarError::NonPositive { .. })));
    }

    #[test]
    fn bar_date_is_utc_calendar_day() {
        let date = sample_bar().date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
