//! HorizonLab CLI: indicator, backtest, details, and screen commands.
//!
//! Commands:
//! - `indicator`: compute one indicator and print it as CSV
//! - `backtest`: run one strategy (or all) over a symbol
//! - `details`: drill into one horizon of a saved report
//! - `screen`: rank every strategy across a symbol universe
//!
//! Price data comes from a CSV directory (`--data-dir`) or the deterministic
//! synthetic generator (`--synthetic N`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use horizonlab_core::data::{CsvProvider, SeriesProvider, SyntheticProvider};
use horizonlab_core::indicators::{compute_indicator, IndicatorKind, IndicatorOutput};
use horizonlab_core::PriceSeries;
use horizonlab_runner::{
    export_report_json, export_reports_json, export_trades_csv, generate_report, load_reports,
    rank_strategies, run_all_strategies, run_backtest_with, screen, view_details,
    BacktestOptions, BacktestReport, Bucket, ExitPairing, HorizonKey, RankBy, ScreenResult,
    ScreenerConfig, ScreenerRow, Stats, StrategyKey,
};

#[derive(Parser)]
#[command(
    name = "horizonlab",
    about = "HorizonLab CLI — indicator engine and multi-horizon strategy backtester"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where price series come from.
#[derive(Args, Clone)]
struct Source {
    /// Directory holding one `<SYMBOL>.csv` per symbol.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Generate N synthetic bars per symbol instead of reading CSV.
    #[arg(long)]
    synthetic: Option<usize>,
}

impl Source {
    fn provider(&self) -> Box<dyn SeriesProvider> {
        match self.synthetic {
            Some(bars) => Box::new(SyntheticProvider::new(bars)),
            None => Box::new(CsvProvider::new(&self.data_dir)),
        }
    }

    fn load(&self, symbol: &str) -> Result<PriceSeries> {
        let provider = self.provider();
        provider
            .fetch_all(symbol)
            .with_context(|| format!("loading {symbol} from {}", provider.name()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one indicator and print every output line as CSV.
    Indicator {
        /// Symbol to load.
        #[arg(long)]
        symbol: String,

        /// Indicator kind: sma, ema, stddev, bollinger, rsi, macd, stochastic, ichimoku, adx, fibonacci.
        #[arg(long)]
        kind: IndicatorKind,

        /// Override the period (ignored by macd, ichimoku and fibonacci).
        #[arg(long)]
        period: Option<usize>,

        /// Override the Bollinger band multiplier.
        #[arg(long)]
        multiplier: Option<f64>,

        #[command(flatten)]
        source: Source,
    },
    /// Backtest one strategy, or `all`, across every horizon.
    Backtest {
        /// Symbol to load.
        #[arg(long)]
        symbol: String,

        /// Strategy key (rsi, bollinger, macd, sma20, sma50, sma200, ichimoku, adx) or `all`.
        #[arg(long, default_value = "all")]
        strategy: String,

        /// How signal exits pair with entries: overlapping or single_position.
        #[arg(long, default_value_t = ExitPairing::Overlapping)]
        pairing: ExitPairing,

        /// Print the report(s) as JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the report(s) as JSON to this path.
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write the signal-exit trade tape as CSV (single strategy only).
        #[arg(long)]
        trades_csv: Option<PathBuf>,

        /// Print a Markdown summary (single strategy only).
        #[arg(long, default_value_t = false)]
        markdown: bool,

        #[command(flatten)]
        source: Source,
    },
    /// Show the statistics and trades of one horizon of a saved report.
    Details {
        /// JSON report written by `backtest --save`.
        #[arg(long)]
        report: PathBuf,

        /// Holding period in bars, or `signal`.
        #[arg(long)]
        horizon: HorizonKey,

        /// Horizon bucket: short or long.
        #[arg(long, default_value_t = Bucket::Short)]
        bucket: Bucket,

        /// Strategy to pick when the file holds several reports.
        #[arg(long)]
        strategy: Option<StrategyKey>,
    },
    /// Screen a symbol universe for the best short- and long-horizon setups.
    Screen {
        /// Symbols to screen, added to those in the config.
        symbols: Vec<String>,

        /// Screener config (TOML).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rows kept per bucket (overrides the config).
        #[arg(long)]
        top: Option<usize>,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Indicator {
            symbol,
            kind,
            period,
            multiplier,
            source,
        } => run_indicator(&source, &symbol, kind, period, multiplier),
        Commands::Backtest {
            symbol,
            strategy,
            pairing,
            json,
            save,
            trades_csv,
            markdown,
            source,
        } => run_backtest_cmd(
            &source,
            &symbol,
            &strategy,
            pairing,
            OutputFlags {
                json,
                markdown,
                save,
                trades_csv,
            },
        ),
        Commands::Details {
            report,
            horizon,
            bucket,
            strategy,
        } => run_details(&report, horizon, bucket, strategy),
        Commands::Screen {
            symbols,
            config,
            top,
            json,
            source,
        } => run_screen(&source, symbols, config.as_deref(), top, json),
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "horizonlab_cli=debug,horizonlab_core=debug,horizonlab_runner=debug"
    } else {
        "horizonlab_cli=info,horizonlab_core=info,horizonlab_runner=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ─── indicator ──────────────────────────────────────────────────────

fn run_indicator(
    source: &Source,
    symbol: &str,
    mut kind: IndicatorKind,
    period: Option<usize>,
    multiplier: Option<f64>,
) -> Result<()> {
    if let Some(period) = period {
        kind = kind.with_period(period);
    }
    if let Some(multiplier) = multiplier {
        kind = kind.with_multiplier(multiplier);
    }

    let series = source.load(symbol)?;
    let output = compute_indicator(&kind, &series)?;

    if let IndicatorOutput::Fibonacci(levels) = &output {
        let Some(levels) = levels else {
            bail!("{symbol}: no bars to compute Fibonacci levels");
        };
        println!("{symbol} {}: high {:.4}, low {:.4}", kind.name(), levels.max, levels.min);
        println!("{:<14} {:>8} {:>12}", "Level", "Ratio", "Price");
        println!("{}", "-".repeat(36));
        for level in &levels.levels {
            println!("{:<14} {:>8.3} {:>12.4}", level.label, level.ratio, level.price);
        }
        return Ok(());
    }

    let named = output.named_series(&kind.name());
    let columns: Vec<(&str, &[f64])> = named.iter().collect();

    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    println!("date,close,{}", header.join(","));
    for (i, bar) in series.bars().iter().enumerate() {
        let date = bar
            .date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| bar.timestamp.to_string());
        let cells: Vec<String> = columns.iter().map(|(_, values)| format_cell(values[i])).collect();
        println!("{date},{},{}", bar.close, cells.join(","));
    }
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:.4}")
    }
}

// ─── backtest ───────────────────────────────────────────────────────

struct OutputFlags {
    json: bool,
    markdown: bool,
    save: Option<PathBuf>,
    trades_csv: Option<PathBuf>,
}

fn run_backtest_cmd(
    source: &Source,
    symbol: &str,
    strategy: &str,
    pairing: ExitPairing,
    flags: OutputFlags,
) -> Result<()> {
    let series = source.load(symbol)?;
    let options = BacktestOptions { pairing };

    if strategy.eq_ignore_ascii_case("all") {
        if flags.trades_csv.is_some() || flags.markdown {
            bail!("--trades-csv and --markdown need a single --strategy");
        }
        let reports = run_all_strategies(&series, &options);
        if let Some(path) = &flags.save {
            write_file(path, &export_reports_json(&reports)?)?;
        }
        if flags.json {
            println!("{}", export_reports_json(&reports)?);
            return Ok(());
        }
        for report in &reports {
            print_report(report);
        }
        print_top(&reports);
        return Ok(());
    }

    let key: StrategyKey = strategy.parse()?;
    let report = run_backtest_with(&series, key, &options);

    if let Some(path) = &flags.save {
        write_file(path, &export_report_json(&report)?)?;
    }
    if let Some(path) = &flags.trades_csv {
        write_file(path, &export_trades_csv(&report.signal.trades)?)?;
    }

    if flags.json {
        println!("{}", export_report_json(&report)?);
    } else if flags.markdown {
        print!("{}", generate_report(&report));
    } else {
        print_report(&report);
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved");
    Ok(())
}

fn print_stats_row(label: &str, stats: &Stats) {
    println!(
        "{:<12} {:>7} {:>9.1}% {:>+10.2}% {:>+9.2}% {:>+9.2}%",
        label, stats.count, stats.win_rate, stats.avg_return, stats.max_win, stats.max_loss
    );
}

fn print_report(report: &BacktestReport) {
    println!();
    println!(
        "{} — {} ({} bars, {})",
        report.symbol,
        report.strategy.label(),
        report.bar_count,
        report.pairing
    );
    println!(
        "{:<12} {:>7} {:>10} {:>11} {:>10} {:>10}",
        "Horizon", "Trades", "Win Rate", "Avg Return", "Max Win", "Max Loss"
    );
    println!("{}", "-".repeat(65));
    for bucket in [Bucket::Short, Bucket::Long] {
        for (&days, stats) in report.bucket(bucket) {
            print_stats_row(&HorizonKey::Days(days).label(), stats);
        }
    }
    print_stats_row(&HorizonKey::Signal.label(), &report.signal);
}

fn print_top(reports: &[BacktestReport]) {
    for bucket in [Bucket::Short, Bucket::Long] {
        println!();
        println!("Top {bucket} horizons by total return:");
        for (rank, row) in rank_strategies(reports, bucket, RankBy::TotalReturn, 3)
            .iter()
            .enumerate()
        {
            println!(
                "  {}. {:<22} {:<10} {:>+9.2}% over {} trades ({:.1}% wins)",
                rank + 1,
                row.strategy.label(),
                row.label,
                row.total_return,
                row.count,
                row.win_rate
            );
        }
    }
}

// ─── details ────────────────────────────────────────────────────────

fn run_details(
    path: &Path,
    horizon: HorizonKey,
    bucket: Bucket,
    strategy: Option<StrategyKey>,
) -> Result<()> {
    let reports = load_reports(path)?;
    let report = match strategy {
        Some(key) => reports
            .iter()
            .find(|r| r.strategy == key)
            .with_context(|| format!("no {key} report in {}", path.display()))?,
        None if reports.len() == 1 => &reports[0],
        None => bail!(
            "{} holds {} reports; pick one with --strategy",
            path.display(),
            reports.len()
        ),
    };

    let Some(stats) = view_details(report, horizon, bucket) else {
        bail!(
            "no {bucket} horizon '{horizon}' in {} {} report",
            report.symbol,
            report.strategy
        );
    };

    println!("{} — {} — {}", report.symbol, report.strategy.label(), horizon.label());
    println!(
        "Trades: {}  Wins: {}  Losses: {}  Win rate: {:.1}%",
        stats.count, stats.wins, stats.losses, stats.win_rate
    );
    println!(
        "Avg return: {:+.2}%  Max win: {:+.2}%  Max loss: {:+.2}%",
        stats.avg_return, stats.max_win, stats.max_loss
    );
    println!();
    print!("{}", export_trades_csv(&stats.trades)?);
    Ok(())
}

// ─── screen ─────────────────────────────────────────────────────────

fn run_screen(
    source: &Source,
    symbols: Vec<String>,
    config_path: Option<&Path>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ScreenerConfig::from_file(path)?,
        None => ScreenerConfig::default(),
    };
    if let Some(top) = top {
        config.top_n = top;
    }
    config.symbols.extend(symbols);
    let universe = config.all_symbols();

    let provider = source.provider();
    let result = screen(provider.as_ref(), &universe, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_screen(&result);
    Ok(())
}

fn print_rows(title: &str, rows: &[ScreenerRow]) {
    println!();
    println!("{title}");
    println!(
        "{:<4} {:<8} {:<22} {:<10} {:>8} {:>9} {:>6} {:>10} {:>10} {:>10} {:>5}",
        "#", "Symbol", "Strategy", "Horizon", "Win", "Avg", "Trades", "Buy", "Target", "Stop", "R/R"
    );
    println!("{}", "-".repeat(112));
    for (i, row) in rows.iter().enumerate() {
        let (buy, target, stop, rr) = row
            .recommendation
            .as_ref()
            .map(|r| (r.buy_price, r.target_price, r.stop_loss, r.risk_reward))
            .unwrap_or((row.last_price, f64::NAN, f64::NAN, f64::NAN));
        println!(
            "{:<4} {:<8} {:<22} {:<10} {:>7.1}% {:>+8.2}% {:>6} {:>10.2} {:>10.2} {:>10.2} {:>5.1}",
            i + 1,
            row.symbol,
            row.strategy_label,
            row.horizon_label,
            row.win_rate,
            row.avg_return,
            row.count,
            buy,
            target,
            stop,
            rr
        );
    }
}

fn print_screen(result: &ScreenResult) {
    println!(
        "Scanned {} symbols with {} strategies ({} skipped, {} failed)",
        result.scanned,
        result.strategies,
        result.skipped.len(),
        result.failed.len()
    );
    print_rows("Short-term (3-14 days)", &result.short);
    print_rows("Long-term (1-12 months)", &result.long);
    for failed in &result.failed {
        eprintln!("{}: {}", failed.symbol, failed.error);
    }
}
