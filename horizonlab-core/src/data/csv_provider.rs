//! CSV file provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` with a header row. The time column may be named
//! `timestamp` (Unix seconds) or `date` (`YYYY-MM-DD`, taken as midnight UTC).
//! Rows must already be in ascending time order; nothing is sorted.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, SeriesProvider};
use crate::domain::{Bar, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "date", alias = "Date", alias = "Timestamp")]
    timestamp: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Parse a time cell as Unix seconds or an ISO calendar date.
fn parse_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<i64>() {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Parse every row of `path` into bars, without range filtering.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => DataError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => DataError::Parse {
                    path: path.to_path_buf(),
                    message: format!("{other:?}"),
                },
            })?;

        let mut bars = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            let row = result.map_err(|e| DataError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let timestamp = parse_time(&row.timestamp).ok_or_else(|| DataError::Parse {
                path: path.to_path_buf(),
                message: format!("unrecognised time value '{}'", row.timestamp),
            })?;
            if !row.volume.is_finite() || row.volume < 0.0 {
                return Err(DataError::Parse {
                    path: path.to_path_buf(),
                    message: format!("invalid volume {} at {timestamp}", row.volume),
                });
            }
            bars.push(Bar::new(
                timestamp,
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume.round() as u64,
            ));
        }
        Ok(bars)
    }
}

impl SeriesProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, start: i64, end: i64) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::NotFound {
                symbol: symbol.to_string(),
                path,
            });
        }

        let bars: Vec<Bar> = Self::read_bars(&path)?
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect();
        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded csv series");

        Ok(PriceSeries::new(symbol, bars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, symbol: &str, body: &str) {
        fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
    }

    #[test]
    fn reads_date_column() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "SPY",
            "date,open,high,low,close,volume\n\
             2024-01-02,100,102,99,101,1000\n\
             2024-01-03,101,103,100,102.5,1200\n",
        );
        let series = CsvProvider::new(dir.path()).fetch_all("SPY").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.bars()[0].timestamp, 1_704_153_600);
        assert_eq!(series.last_close(), Some(102.5));
    }

    #[test]
    fn reads_timestamp_column_and_filters_range() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "QQQ",
            "timestamp,open,high,low,close,volume\n\
             100,10,11,9,10,5\n\
             200,10,11,9,10.5,5\n\
             300,10.5,12,10,11,5\n",
        );
        let series = CsvProvider::new(dir.path()).fetch("QQQ", 150, 300).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].timestamp, 200);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvProvider::new(dir.path()).fetch_all("NOPE").unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "BAD",
            "date,open,high,low,close,volume\n2024-01-02,abc,102,99,101,1000\n",
        );
        let err = CsvProvider::new(dir.path()).fetch_all("BAD").unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }

    #[test]
    fn out_of_order_rows_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "ODD",
            "date,open,high,low,close,volume\n\
             2024-01-03,100,102,99,101,1000\n\
             2024-01-02,100,102,99,101,1000\n",
        );
        let err = CsvProvider::new(dir.path()).fetch_all("ODD").unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }
}
