//! HorizonLab Runner: backtest engine, ranking, screener, export.
//!
//! This crate builds on `horizonlab-core` to provide:
//! - Strategy keys and their signal rules
//! - Fixed-horizon and signal-exit trade simulation
//! - Per-horizon statistics and `BacktestReport`
//! - Single-symbol strategy ranking and the multi-symbol screener
//! - Monthly trade distribution and trade-plan recommendations
//! - JSON / CSV / Markdown export

pub mod config;
pub mod export;
pub mod monthly;
pub mod ranking;
pub mod report;
pub mod screener;
pub mod signals;
pub mod simulator;
pub mod stats;
pub mod strategy;

pub use config::{ConfigError, ScreenerConfig};
pub use export::{
    export_report_json, export_reports_json, export_trades_csv, generate_report,
    import_report_json, import_reports_json, load_reports,
};
pub use monthly::{best_month, monthly_distribution, MonthStats};
pub use ranking::{by_horizon, rank_strategies, RankBy, RankedHorizon};
pub use report::{
    run_all_strategies, run_backtest, run_backtest_with, view_details, BacktestOptions,
    BacktestReport, Bucket, HorizonKey, SCHEMA_VERSION,
};
pub use screener::{screen, Recommendation, ScreenError, ScreenResult, ScreenerRow};
pub use signals::{generate_signals, SignalSet};
pub use simulator::{ExitPairing, LONG_HORIZONS, SHORT_HORIZONS};
pub use stats::Stats;
pub use strategy::{StrategyError, StrategyKey};
