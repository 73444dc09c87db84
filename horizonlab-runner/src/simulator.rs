//! Trade simulation: fixed-horizon exits and signal exits.
//!
//! Both policies price entries and exits at the bar close and start from the
//! same entry set. Neither forces an exit at the end of the series: an entry
//! without a reachable exit produces no trade.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use horizonlab_core::{PriceSeries, Trade};

/// Short-term holding periods, in bars.
pub const SHORT_HORIZONS: [usize; 4] = [3, 5, 9, 14];

/// Long-term holding periods, in bars (~3, 6, 9, 12 months).
pub const LONG_HORIZONS: [usize; 4] = [65, 130, 195, 260];

/// Display label for a fixed horizon.
pub fn horizon_label(days: usize) -> String {
    match days {
        65 => "3 Months".to_string(),
        130 => "6 Months".to_string(),
        195 => "9 Months".to_string(),
        260 => "1 Year".to_string(),
        d => format!("{d} Days"),
    }
}

/// How signal-exit trades pair entries with exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPairing {
    /// Every entry independently takes the first exit after it, so one exit
    /// may close several entries.
    #[default]
    Overlapping,
    /// Flat → long → flat: entries while long are ignored, and a new entry
    /// must come strictly after the previous exit bar.
    SinglePosition,
}

impl FromStr for ExitPairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlapping" => Ok(Self::Overlapping),
            "single" | "single_position" | "single-position" => Ok(Self::SinglePosition),
            other => Err(format!(
                "unknown exit pairing '{other}' (expected 'overlapping' or 'single')"
            )),
        }
    }
}

impl fmt::Display for ExitPairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlapping => f.write_str("overlapping"),
            Self::SinglePosition => f.write_str("single_position"),
        }
    }
}

/// One trade per entry whose `entry + horizon` bar exists.
pub fn fixed_horizon_trades(series: &PriceSeries, entries: &[usize], horizon: usize) -> Vec<Trade> {
    entries
        .iter()
        .filter_map(|&entry| Trade::between(series, entry, entry.checked_add(horizon)?))
        .collect()
}

/// Pair entries with the next exit signal strictly after them.
///
/// `exits` must be ascending.
pub fn signal_exit_trades(
    series: &PriceSeries,
    entries: &[usize],
    exits: &[usize],
    pairing: ExitPairing,
) -> Vec<Trade> {
    let next_exit = |entry: usize| -> Option<usize> {
        let pos = exits.partition_point(|&e| e <= entry);
        exits.get(pos).copied()
    };

    match pairing {
        ExitPairing::Overlapping => entries
            .iter()
            .filter_map(|&entry| Trade::between(series, entry, next_exit(entry)?))
            .collect(),
        ExitPairing::SinglePosition => {
            let mut trades = Vec::new();
            let mut last_exit: Option<usize> = None;
            for &entry in entries {
                if last_exit.is_some_and(|x| entry <= x) {
                    continue;
                }
                // still long at the end of the data
                let Some(exit) = next_exit(entry) else {
                    break;
                };
                if let Some(trade) = Trade::between(series, entry, exit) {
                    trades.push(trade);
                }
                last_exit = Some(exit);
            }
            trades
        }
    }
}
