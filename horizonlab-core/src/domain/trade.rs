//! Trade: one hypothetical entry → exit round trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::PriceSeries;

/// A completed hypothetical trade.
///
/// Created only by the trade simulator. `pnl` is the fractional return
/// `(exit_price - entry_price) / entry_price`; `days` is the number of bars held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_index: usize,
    pub entry_date: i64,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub exit_date: i64,
    pub exit_price: f64,

    pub days: usize,
    pub pnl: f64,
}

impl Trade {
    /// Build a trade between two bar positions of `series`, priced at the closes.
    ///
    /// Returns `None` if either index is out of range or the exit does not
    /// come after the entry.
    pub fn between(series: &PriceSeries, entry_index: usize, exit_index: usize) -> Option<Self> {
        if exit_index <= entry_index {
            return None;
        }
        let bars = series.bars();
        let entry = bars.get(entry_index)?;
        let exit = bars.get(exit_index)?;
        Some(Self {
            entry_index,
            entry_date: entry.timestamp,
            entry_price: entry.close,
            exit_index,
            exit_date: exit.timestamp,
            exit_price: exit.close,
            days: exit_index - entry_index,
            pnl: (exit.close - entry.close) / entry.close,
        })
    }

    /// Return in percent.
    pub fn return_pct(&self) -> f64 {
        self.pnl * 100.0
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// UTC calendar date of the entry bar.
    pub fn entry_day(&self) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(self.entry_date, 0).map(|dt| dt.date_naive())
    }
}
