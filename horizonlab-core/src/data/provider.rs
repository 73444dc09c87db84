//! Series provider trait and structured error types.
//!
//! The SeriesProvider trait abstracts over where daily bars come from (CSV
//! files on disk, a deterministic generator) so the engines never touch I/O
//! and tests can swap in synthetic data.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data for symbol '{symbol}' (looked in {path})")]
    NotFound { symbol: String, path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("validation error: {0}")]
    Validation(#[from] SeriesError),

    #[error("insufficient data for {symbol}: {bars} bars, need at least {required}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        required: usize,
    },
}

/// Source of daily price series.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the series for `symbol`, keeping bars with `start <= timestamp <= end`.
    fn fetch(&self, symbol: &str, start: i64, end: i64) -> Result<PriceSeries, DataError>;

    /// Fetch everything the provider has for `symbol`.
    fn fetch_all(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        self.fetch(symbol, i64::MIN, i64::MAX)
    }
}

/// Reject a series shorter than `required` bars.
pub fn require_bars(series: &PriceSeries, required: usize) -> Result<(), DataError> {
    if series.len() < required {
        return Err(DataError::InsufficientData {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    #[test]
    fn require_bars_reports_counts() {
        let bars = vec![Bar::new(0, 10.0, 11.0, 9.0, 10.5, 100)];
        let series = PriceSeries::new("AAA", bars).unwrap();
        assert!(require_bars(&series, 1).is_ok());
        let err = require_bars(&series, 100).unwrap_err();
        assert!(matches!(
            err,
            DataError::InsufficientData {
                bars: 1,
                required: 100,
                ..
            }
        ));
        assert!(err.to_string().contains("AAA"));
    }
}
