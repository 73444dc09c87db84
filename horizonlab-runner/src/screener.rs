//! Market screener: run every strategy over many symbols and surface the
//! strongest short- and long-horizon setups, each with a trade plan.
//!
//! Symbols are independent units processed in parallel. A symbol that fails
//! to load is logged and recorded, never fatal to the scan.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use horizonlab_core::data::{require_bars, SeriesProvider};
use horizonlab_core::Trade;

use crate::config::ScreenerConfig;
use crate::monthly::best_month;
use crate::report::{run_all_strategies, BacktestOptions, BacktestReport, Bucket};
use crate::simulator::horizon_label;
use crate::stats::Stats;
use crate::strategy::{Conditions, StrategyKey};

const BUY_ZONE_BAND: f64 = 0.03;
const MIN_EXPECTED_RETURN: f64 = 0.08;
const MAX_STOP_LOSS: f64 = 0.06;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("no symbols to screen")]
    NoSymbols,

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Entry zone, target and stop for one screener row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub buy_price: f64,
    pub buy_low: f64,
    pub buy_high: f64,
    /// Fractional, e.g. 0.08 for +8%.
    pub expected_return: f64,
    pub target_price: f64,
    /// Fractional, at most 0.06.
    pub stop_loss_pct: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
    pub conditions: Conditions,
    /// 1..=12.
    pub best_month: Option<u32>,
    pub horizon_label: String,
}

impl Recommendation {
    /// Build a plan from the last close and the Stats of the chosen horizon.
    pub fn from_stats(last_price: f64, stats: &Stats, strategy: StrategyKey, horizon: usize) -> Self {
        Self::new(
            last_price,
            stats.avg_return,
            stats.max_loss,
            &stats.trades,
            strategy,
            horizon,
        )
    }

    /// `avg_return` and `max_loss` are in percent, as in `Stats`.
    pub fn new(
        last_price: f64,
        avg_return: f64,
        max_loss: f64,
        trades: &[Trade],
        strategy: StrategyKey,
        horizon: usize,
    ) -> Self {
        let expected_return = (avg_return / 100.0).max(MIN_EXPECTED_RETURN);
        let target_price = last_price * (1.0 + expected_return);

        let mut stop_loss_pct = (max_loss.abs() / 100.0).min(MAX_STOP_LOSS);
        if stop_loss_pct == 0.0 {
            stop_loss_pct = MAX_STOP_LOSS;
        }
        let stop_loss = last_price * (1.0 - stop_loss_pct);

        let risk = last_price - stop_loss;
        let reward = target_price - last_price;
        let risk_reward = if risk > 0.0 { reward / risk } else { 1.0 };

        Self {
            buy_price: last_price,
            buy_low: last_price * (1.0 - BUY_ZONE_BAND),
            buy_high: last_price * (1.0 + BUY_ZONE_BAND),
            expected_return,
            target_price,
            stop_loss_pct,
            stop_loss,
            risk_reward,
            conditions: strategy.conditions(),
            best_month: best_month(trades),
            horizon_label: horizon_label(horizon),
        }
    }
}

/// One `(symbol, strategy, horizon)` candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenerRow {
    pub symbol: String,
    pub sector: Option<String>,
    pub strategy: StrategyKey,
    pub strategy_label: &'static str,
    pub bucket: Bucket,
    pub horizon: usize,
    pub horizon_label: String,
    pub win_rate: f64,
    pub avg_return: f64,
    pub total_return: f64,
    pub max_win: f64,
    pub max_loss: f64,
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub last_price: f64,
    pub trades: Vec<Trade>,
    pub recommendation: Option<Recommendation>,
}

/// All reports for one successfully scanned symbol.
#[derive(Debug, Clone)]
pub struct SymbolScan {
    pub symbol: String,
    pub last_price: f64,
    pub reports: Vec<BacktestReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub bars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSymbol {
    pub symbol: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenResult {
    pub short: Vec<ScreenerRow>,
    pub long: Vec<ScreenerRow>,
    pub scanned: usize,
    pub strategies: usize,
    pub skipped: Vec<SkippedSymbol>,
    pub failed: Vec<FailedSymbol>,
}

enum Outcome {
    Scanned(SymbolScan),
    Skipped(SkippedSymbol),
    Failed(FailedSymbol),
}

fn scan_symbol(provider: &dyn SeriesProvider, symbol: &str, config: &ScreenerConfig) -> Outcome {
    let series = match provider.fetch_all(symbol) {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol, provider = provider.name(), error = %e, "symbol failed to load");
            return Outcome::Failed(FailedSymbol {
                symbol: symbol.to_string(),
                error: e.to_string(),
            });
        }
    };

    let skipped = || {
        Outcome::Skipped(SkippedSymbol {
            symbol: symbol.to_string(),
            bars: series.len(),
        })
    };
    if let Err(e) = require_bars(&series, config.min_bars) {
        debug!(symbol, error = %e, "skipping short series");
        return skipped();
    }
    let Some(last_price) = series.last_close() else {
        return skipped();
    };

    let options = BacktestOptions {
        pairing: config.pairing,
    };
    Outcome::Scanned(SymbolScan {
        symbol: symbol.to_string(),
        last_price,
        reports: run_all_strategies(&series, &options),
    })
}

/// Fetch, backtest and rank every symbol.
pub fn screen(
    provider: &dyn SeriesProvider,
    symbols: &[String],
    config: &ScreenerConfig,
) -> Result<ScreenResult, ScreenError> {
    config.validate()?;
    if symbols.is_empty() {
        return Err(ScreenError::NoSymbols);
    }

    let outcomes: Vec<Outcome> = symbols
        .par_iter()
        .map(|symbol| scan_symbol(provider, symbol, config))
        .collect();

    let mut scans = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Scanned(scan) => scans.push(scan),
            Outcome::Skipped(s) => skipped.push(s),
            Outcome::Failed(f) => failed.push(f),
        }
    }

    let result = rank_scans(&scans, config, skipped, failed);
    info!(
        scanned = result.scanned,
        skipped = result.skipped.len(),
        failed = result.failed.len(),
        short = result.short.len(),
        long = result.long.len(),
        "screen complete"
    );
    Ok(result)
}

fn collect_rows(scans: &[SymbolScan], config: &ScreenerConfig, bucket: Bucket) -> Vec<ScreenerRow> {
    let min_trades = match bucket {
        Bucket::Short => config.min_trades_short,
        Bucket::Long => config.min_trades_long,
    };

    let mut rows = Vec::new();
    for scan in scans {
        for report in &scan.reports {
            for (&horizon, stats) in report.bucket(bucket) {
                if stats.count < min_trades {
                    continue;
                }
                rows.push(ScreenerRow {
                    symbol: scan.symbol.clone(),
                    sector: config.sector_of(&scan.symbol).map(str::to_string),
                    strategy: report.strategy,
                    strategy_label: report.strategy.label(),
                    bucket,
                    horizon,
                    horizon_label: horizon_label(horizon),
                    win_rate: stats.win_rate,
                    avg_return: stats.avg_return,
                    total_return: stats.total_return(),
                    max_win: stats.max_win,
                    max_loss: stats.max_loss,
                    count: stats.count,
                    wins: stats.wins,
                    losses: stats.losses,
                    last_price: scan.last_price,
                    trades: stats.trades.clone(),
                    recommendation: None,
                });
            }
        }
    }
    rows
}

/// Sort by win rate (stable), keep the best row per symbol, take `top_n`.
fn top_unique(mut rows: Vec<ScreenerRow>, top_n: usize) -> Vec<ScreenerRow> {
    rows.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = std::collections::HashSet::new();
    rows.retain(|row| seen.insert(row.symbol.clone()));
    rows.truncate(top_n);

    for row in &mut rows {
        row.recommendation = Some(Recommendation::new(
            row.last_price,
            row.avg_return,
            row.max_loss,
            &row.trades,
            row.strategy,
            row.horizon,
        ));
    }
    rows
}

/// Rank already-computed scans. Symbol order in `scans` breaks win-rate ties.
pub fn rank_scans(
    scans: &[SymbolScan],
    config: &ScreenerConfig,
    skipped: Vec<SkippedSymbol>,
    failed: Vec<FailedSymbol>,
) -> ScreenResult {
    ScreenResult {
        short: top_unique(collect_rows(scans, config, Bucket::Short), config.top_n),
        long: top_unique(collect_rows(scans, config, Bucket::Long), config.top_n),
        scanned: scans.len(),
        strategies: StrategyKey::ALL.len(),
        skipped,
        failed,
    }
}
