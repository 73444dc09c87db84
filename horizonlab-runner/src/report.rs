//! Backtest reports: one strategy over one price series.
//!
//! A report holds Stats for every short and long fixed horizon plus the
//! signal-exit policy. Reports are plain values; collaborators read them and
//! never mutate them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use horizonlab_core::PriceSeries;

use crate::signals::generate_signals;
use crate::simulator::{
    fixed_horizon_trades, horizon_label, signal_exit_trades, ExitPairing, LONG_HORIZONS,
    SHORT_HORIZONS,
};
use crate::stats::Stats;
use crate::strategy::StrategyKey;

/// Current report schema version, bumped on incompatible changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Short,
    Long,
}

impl Bucket {
    pub fn horizons(self) -> &'static [usize] {
        match self {
            Self::Short => &SHORT_HORIZONS,
            Self::Long => &LONG_HORIZONS,
        }
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown bucket '{other}' (expected 'short' or 'long')")),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("short"),
            Self::Long => f.write_str("long"),
        }
    }
}

/// A fixed holding period in bars, or the signal-exit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizonKey {
    Days(usize),
    Signal,
}

impl HorizonKey {
    pub fn label(self) -> String {
        match self {
            Self::Days(days) => horizon_label(days),
            Self::Signal => "Signal Exit".to_string(),
        }
    }
}

impl FromStr for HorizonKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("signal") {
            return Ok(Self::Signal);
        }
        s.parse::<usize>()
            .map(Self::Days)
            .map_err(|_| format!("invalid horizon '{s}' (expected a bar count or 'signal')"))
    }
}

impl fmt::Display for HorizonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::Signal => f.write_str("signal"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestOptions {
    pub pairing: ExitPairing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub schema_version: u32,
    pub symbol: String,
    pub strategy: StrategyKey,
    pub bar_count: usize,
    /// BLAKE3 fingerprint of the input series.
    pub fingerprint: String,
    pub pairing: ExitPairing,
    pub short: BTreeMap<usize, Stats>,
    pub long: BTreeMap<usize, Stats>,
    pub signal: Stats,
}

impl BacktestReport {
    pub fn bucket(&self, bucket: Bucket) -> &BTreeMap<usize, Stats> {
        match bucket {
            Bucket::Short => &self.short,
            Bucket::Long => &self.long,
        }
    }
}

/// Run `strategy` over `series` with default options.
pub fn run_backtest(series: &PriceSeries, strategy: StrategyKey) -> BacktestReport {
    run_backtest_with(series, strategy, &BacktestOptions::default())
}

pub fn run_backtest_with(
    series: &PriceSeries,
    strategy: StrategyKey,
    options: &BacktestOptions,
) -> BacktestReport {
    let signals = generate_signals(series, strategy);

    let by_horizon = |horizons: &[usize]| -> BTreeMap<usize, Stats> {
        horizons
            .iter()
            .map(|&h| {
                let trades = fixed_horizon_trades(series, &signals.entries, h);
                (h, Stats::from_trades(trades))
            })
            .collect()
    };
    let short = by_horizon(&SHORT_HORIZONS);
    let long = by_horizon(&LONG_HORIZONS);
    let signal = Stats::from_trades(signal_exit_trades(
        series,
        &signals.entries,
        &signals.exits,
        options.pairing,
    ));

    debug!(
        symbol = series.symbol(),
        strategy = %strategy,
        bars = series.len(),
        entries = signals.entries.len(),
        exits = signals.exits.len(),
        signal_trades = signal.count,
        "backtest complete"
    );

    BacktestReport {
        schema_version: SCHEMA_VERSION,
        symbol: series.symbol().to_string(),
        strategy,
        bar_count: series.len(),
        fingerprint: series.fingerprint(),
        pairing: options.pairing,
        short,
        long,
        signal,
    }
}

/// Every strategy over `series`, evaluated in parallel, in `StrategyKey::ALL` order.
pub fn run_all_strategies(series: &PriceSeries, options: &BacktestOptions) -> Vec<BacktestReport> {
    StrategyKey::ALL
        .par_iter()
        .map(|&strategy| run_backtest_with(series, strategy, options))
        .collect()
}

/// Look up the Stats of one horizon. `HorizonKey::Signal` ignores `bucket`.
pub fn view_details(report: &BacktestReport, horizon: HorizonKey, bucket: Bucket) -> Option<&Stats> {
    match horizon {
        HorizonKey::Signal => Some(&report.signal),
        HorizonKey::Days(days) => report.bucket(bucket).get(&days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizonlab_core::domain::Bar;

    fn wave(n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.2).sin() * 10.0;
                Bar::new(1_704_153_600 + i as i64 * 86_400, c, c + 1.0, c - 1.0, c, 1_000)
            })
            .collect();
        PriceSeries::new("WAVE", bars).unwrap()
    }

    #[test]
    fn report_has_every_horizon() {
        let report = run_backtest(&wave(200), StrategyKey::Rsi);
        assert_eq!(report.short.keys().copied().collect::<Vec<_>>(), SHORT_HORIZONS);
        assert_eq!(report.long.keys().copied().collect::<Vec<_>>(), LONG_HORIZONS);
        assert_eq!(report.bar_count, 200);
        assert_eq!(report.symbol, "WAVE");
        assert_eq!(report.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn short_series_gives_zero_counts() {
        let report = run_backtest(&wave(100), StrategyKey::Sma200);
        assert!(report.short.values().all(Stats::is_empty));
        assert!(report.long.values().all(Stats::is_empty));
        assert!(report.signal.is_empty());
    }

    #[test]
    fn view_details_lookup() {
        let report = run_backtest(&wave(300), StrategyKey::Sma20);
        assert_eq!(
            view_details(&report, HorizonKey::Days(5), Bucket::Short),
            report.short.get(&5)
        );
        assert_eq!(
            view_details(&report, HorizonKey::Signal, Bucket::Long),
            Some(&report.signal)
        );
        assert!(view_details(&report, HorizonKey::Days(5), Bucket::Long).is_none());
        assert!(view_details(&report, HorizonKey::Days(7), Bucket::Short).is_none());
    }

    #[test]
    fn run_all_keeps_strategy_order() {
        let reports = run_all_strategies(&wave(300), &BacktestOptions::default());
        let order: Vec<StrategyKey> = reports.iter().map(|r| r.strategy).collect();
        assert_eq!(order, StrategyKey::ALL);
    }

    #[test]
    fn horizon_key_parsing_and_labels() {
        assert_eq!("signal".parse::<HorizonKey>(), Ok(HorizonKey::Signal));
        assert_eq!("65".parse::<HorizonKey>(), Ok(HorizonKey::Days(65)));
        assert!("soon".parse::<HorizonKey>().is_err());
        assert_eq!(HorizonKey::Days(65).label(), "3 Months");
        assert_eq!(HorizonKey::Signal.label(), "Signal Exit");
    }
}
