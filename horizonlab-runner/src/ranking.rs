//! Strategy ranking for a single symbol.
//!
//! Every `(strategy, horizon)` cell of one bucket across a set of reports is
//! flattened into a `RankedHorizon` row, then ordered by win rate or by total
//! return. Sorting is stable, so ties keep report order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::report::{BacktestReport, Bucket};
use crate::simulator::horizon_label;
use crate::strategy::StrategyKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    WinRate,
    TotalReturn,
}

impl FromStr for RankBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win_rate" | "winrate" | "win-rate" => Ok(Self::WinRate),
            "total_return" | "return" | "profit" => Ok(Self::TotalReturn),
            other => Err(format!("unknown ranking '{other}'")),
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinRate => f.write_str("win_rate"),
            Self::TotalReturn => f.write_str("total_return"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHorizon {
    pub strategy: StrategyKey,
    pub bucket: Bucket,
    pub horizon: usize,
    pub label: String,
    pub count: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub max_win: f64,
    pub total_return: f64,
}

impl RankedHorizon {
    fn metric(&self, by: RankBy) -> f64 {
        match by {
            RankBy::WinRate => self.win_rate,
            RankBy::TotalReturn => self.total_return,
        }
    }
}

/// All rows of `bucket`, in report order then horizon order.
pub fn flatten_bucket(reports: &[BacktestReport], bucket: Bucket) -> Vec<RankedHorizon> {
    reports
        .iter()
        .flat_map(|report| {
            report.bucket(bucket).iter().map(move |(&horizon, stats)| RankedHorizon {
                strategy: report.strategy,
                bucket,
                horizon,
                label: horizon_label(horizon),
                count: stats.count,
                wins: stats.wins,
                win_rate: stats.win_rate,
                avg_return: stats.avg_return,
                max_win: stats.max_win,
                total_return: stats.total_return(),
            })
        })
        .collect()
}

fn sort_desc(rows: &mut [RankedHorizon], by: RankBy) {
    rows.sort_by(|a, b| {
        b.metric(by)
            .partial_cmp(&a.metric(by))
            .unwrap_or(Ordering::Equal)
    });
}

/// Best `top_n` rows of `bucket` by `by`, descending.
pub fn rank_strategies(
    reports: &[BacktestReport],
    bucket: Bucket,
    by: RankBy,
    top_n: usize,
) -> Vec<RankedHorizon> {
    let mut rows = flatten_bucket(reports, bucket);
    sort_desc(&mut rows, by);
    rows.truncate(top_n);
    rows
}

/// Rows of `bucket` grouped per horizon, each group sorted by win rate.
pub fn by_horizon(reports: &[BacktestReport], bucket: Bucket) -> BTreeMap<usize, Vec<RankedHorizon>> {
    let mut groups: BTreeMap<usize, Vec<RankedHorizon>> = BTreeMap::new();
    for row in flatten_bucket(reports, bucket) {
        groups.entry(row.horizon).or_default().push(row);
    }
    for rows in groups.values_mut() {
        sort_desc(rows, RankBy::WinRate);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;
    use crate::simulator::ExitPairing;

    fn stats(count: usize, wins: usize, avg_return: f64) -> Stats {
        Stats {
            count,
            wins,
            losses: count - wins,
            win_rate: if count == 0 { 0.0 } else { wins as f64 / count as f64 * 100.0 },
            avg_return,
            max_win: 0.0,
            max_loss: 0.0,
            trades: vec![],
        }
    }

    fn report(strategy: StrategyKey, short: [(usize, Stats); 2]) -> BacktestReport {
        BacktestReport {
            schema_version: 1,
            symbol: "RANK".into(),
            strategy,
            bar_count: 500,
            fingerprint: String::new(),
            pairing: ExitPairing::Overlapping,
            short: short.into_iter().collect(),
            long: BTreeMap::new(),
            signal: Stats::default(),
        }
    }

    fn fixture() -> Vec<BacktestReport> {
        vec![
            report(StrategyKey::Rsi, [(3, stats(10, 6, 1.0)), (5, stats(4, 4, 0.5))]),
            report(StrategyKey::Macd, [(3, stats(20, 12, 2.0)), (5, stats(10, 5, -1.0))]),
        ]
    }

    #[test]
    fn ranks_by_win_rate_stably() {
        let rows = rank_strategies(&fixture(), Bucket::Short, RankBy::WinRate, 3);
        let got: Vec<(StrategyKey, usize)> = rows.iter().map(|r| (r.strategy, r.horizon)).collect();
        // 100%, then the two 60% rows in report order
        assert_eq!(
            got,
            [(StrategyKey::Rsi, 5), (StrategyKey::Rsi, 3), (StrategyKey::Macd, 3)]
        );
    }

    #[test]
    fn ranks_by_total_return() {
        let rows = rank_strategies(&fixture(), Bucket::Short, RankBy::TotalReturn, 2);
        assert_eq!(rows[0].strategy, StrategyKey::Macd);
        assert!((rows[0].total_return - 40.0).abs() < 1e-12);
        assert_eq!(rows[1].strategy, StrategyKey::Rsi);
        assert_eq!(rows[1].horizon, 3);
    }

    #[test]
    fn groups_per_horizon() {
        let groups = by_horizon(&fixture(), Bucket::Short);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&5][0].strategy, StrategyKey::Rsi);
        assert_eq!(groups[&3][0].label, "3 Days");
        assert!(by_horizon(&fixture(), Bucket::Long).is_empty());
    }
}
