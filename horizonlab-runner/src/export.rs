//! Reporting and export: JSON, CSV, and Markdown.
//!
//! - **JSON**: full round-trip serialization of reports with schema versioning
//! - **CSV**: trade tape of one Stats cell for spreadsheet drill-down
//! - **Markdown**: human-readable per-horizon summary of one report
//!
//! Reports carry a `schema_version` field. Newer versions are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use horizonlab_core::Trade;

use crate::report::{BacktestReport, SCHEMA_VERSION};
use crate::stats::Stats;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestReport` to pretty JSON.
pub fn export_report_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Serialize several reports as a JSON array.
pub fn export_reports_json(reports: &[BacktestReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("failed to serialize reports to JSON")
}

fn check_version(report: &BacktestReport) -> Result<()> {
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(())
}

/// Deserialize a `BacktestReport` from JSON, rejecting unknown schema versions.
pub fn import_report_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    check_version(&report)?;
    Ok(report)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<BacktestReport>),
    Many(Vec<BacktestReport>),
}

/// Deserialize either a single report or an array of reports.
pub fn import_reports_json(json: &str) -> Result<Vec<BacktestReport>> {
    let parsed: OneOrMany =
        serde_json::from_str(json).context("failed to deserialize reports from JSON")?;
    let reports = match parsed {
        OneOrMany::One(report) => vec![*report],
        OneOrMany::Many(reports) => reports,
    };
    for report in &reports {
        check_version(report)?;
    }
    Ok(reports)
}

/// Read reports from a JSON file written by `export_report_json` or
/// `export_reports_json`.
pub fn load_reports(path: &Path) -> Result<Vec<BacktestReport>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_reports_json(&json)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn format_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Export a trade list as CSV.
///
/// Columns: entry_bar, entry_date, entry_price, exit_bar, exit_date,
/// exit_price, days, return_pct
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entry_bar",
        "entry_date",
        "entry_price",
        "exit_bar",
        "exit_date",
        "exit_price",
        "days",
        "return_pct",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.entry_index.to_string(),
            &format_date(t.entry_date),
            &format!("{:.4}", t.entry_price),
            &t.exit_index.to_string(),
            &format_date(t.exit_date),
            &format!("{:.4}", t.exit_price),
            &t.days.to_string(),
            &format!("{:.4}", t.return_pct()),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown reports ───────────────────────────────────────────────

fn stats_row(label: &str, stats: &Stats) -> String {
    format!(
        "| {label} | {} | {:.1}% | {:+.2}% | {:+.2}% | {:+.2}% |\n",
        stats.count, stats.win_rate, stats.avg_return, stats.max_win, stats.max_loss
    )
}

/// Generate a Markdown summary for one report.
pub fn generate_report(report: &BacktestReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str(&format!(
        "# {}: {}\n\n",
        report.symbol,
        report.strategy.label()
    ));
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Bars | {} |\n", report.bar_count));
    md.push_str(&format!("| Exit Pairing | {} |\n", report.pairing));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.fingerprint));
    md.push('\n');

    md.push_str("| Horizon | Trades | Win Rate | Avg Return | Max Win | Max Loss |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: |\n");
    for (&days, stats) in report.short.iter().chain(report.long.iter()) {
        md.push_str(&stats_row(&crate::simulator::horizon_label(days), stats));
    }
    md.push_str(&stats_row("Signal Exit", &report.signal));

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::run_backtest;
    use crate::strategy::StrategyKey;
    use horizonlab_core::data::{SeriesProvider, SyntheticProvider};

    fn sample_report() -> BacktestReport {
        let series = SyntheticProvider::new(400).fetch_all("EXP").unwrap();
        run_backtest(&series, StrategyKey::Sma20)
    }

    #[test]
    fn json_round_trip() {
        let report = sample_report();
        let json = export_report_json(&report).unwrap();
        let back = import_report_json(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn json_round_trip_is_exact_for_every_strategy() {
        let series = SyntheticProvider::new(700).fetch_all("EXACT").unwrap();
        for strategy in StrategyKey::ALL {
            let report = run_backtest(&series, strategy);
            let back = import_report_json(&export_report_json(&report).unwrap()).unwrap();
            assert_eq!(back, report, "{strategy}");
        }
    }

    #[test]
    fn future_schema_rejected() {
        let mut report = sample_report();
        report.schema_version = SCHEMA_VERSION + 1;
        let json = export_report_json(&report).unwrap();
        let err = import_report_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn import_accepts_single_or_array() {
        let report = sample_report();
        let one = import_reports_json(&export_report_json(&report).unwrap()).unwrap();
        assert_eq!(one.len(), 1);
        let many =
            import_reports_json(&export_reports_json(&[report.clone(), report]).unwrap()).unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn trades_csv_has_header_and_rows() {
        let report = sample_report();
        let trades = &report.short[&5].trades;
        let csv = export_trades_csv(trades).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "entry_bar,entry_date,entry_price,exit_bar,exit_date,exit_price,days,return_pct");
        assert_eq!(lines.len(), trades.len() + 1);
    }

    #[test]
    fn trades_csv_formats_dates() {
        let trade = Trade {
            entry_index: 3,
            entry_date: 1_704_153_600,
            entry_price: 100.0,
            exit_index: 8,
            exit_date: 1_704_585_600,
            exit_price: 103.0,
            days: 5,
            pnl: 0.03,
        };
        let csv = export_trades_csv(&[trade]).unwrap();
        assert!(csv.contains("3,2024-01-02,100.0000,8,2024-01-07,103.0000,5,3.0000"));
    }

    #[test]
    fn markdown_lists_every_horizon() {
        let md = generate_report(&sample_report());
        for label in ["3 Days", "14 Days", "3 Months", "1 Year", "Signal Exit"] {
            assert!(md.contains(label), "missing {label}");
        }
    }
}
