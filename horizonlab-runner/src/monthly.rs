//! Calendar-month breakdown of trades by entry month.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use horizonlab_core::Trade;

/// Minimum trades in a month before it can be the best month.
pub const MIN_TRADES_PER_MONTH: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    pub wins: usize,
    pub total: usize,
    /// Sum of winning trades' pnl (fractional).
    pub profit: f64,
}

impl MonthStats {
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64
        }
    }
}

/// Per-month counts, index 0 = January.
pub fn monthly_distribution(trades: &[Trade]) -> [MonthStats; 12] {
    let mut months = [MonthStats::default(); 12];
    for trade in trades {
        let Some(day) = trade.entry_day() else {
            continue;
        };
        let month = &mut months[day.month0() as usize];
        month.total += 1;
        if trade.is_winner() {
            month.wins += 1;
            month.profit += trade.pnl;
        }
    }
    months
}

/// Month (1..=12) with the highest positive win rate among months with at
/// least two trades. Ties keep the earliest month.
pub fn best_month(trades: &[Trade]) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (i, month) in monthly_distribution(trades).iter().enumerate() {
        if month.total < MIN_TRADES_PER_MONTH {
            continue;
        }
        let rate = month.win_rate();
        if rate > best.map_or(0.0, |(_, r)| r) {
            best = Some((i as u32 + 1, rate));
        }
    }
    best.map(|(m, _)| m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade_on(y: i32, m: u32, d: u32, pnl: f64) -> Trade {
        let ts = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        Trade {
            entry_index: 0,
            entry_date: ts,
            entry_price: 100.0,
            exit_index: 5,
            exit_date: ts + 5 * 86_400,
            exit_price: 100.0 * (1.0 + pnl),
            days: 5,
            pnl,
        }
    }

    #[test]
    fn distribution_by_entry_month() {
        let trades = [
            trade_on(2023, 1, 5, 0.02),
            trade_on(2024, 1, 9, -0.01),
            trade_on(2024, 3, 1, 0.05),
        ];
        let months = monthly_distribution(&trades);
        assert_eq!(months[0].total, 2);
        assert_eq!(months[0].wins, 1);
        assert!((months[0].profit - 0.02).abs() < 1e-12);
        assert_eq!(months[2].total, 1);
        assert_eq!(months[1], MonthStats::default());
    }

    #[test]
    fn best_month_needs_two_trades() {
        let trades = [
            trade_on(2024, 2, 1, 0.02),
            trade_on(2024, 5, 1, 0.03),
            trade_on(2024, 5, 8, -0.01),
        ];
        assert_eq!(best_month(&trades), Some(5));
        assert_eq!(best_month(&trades[..2]), None);
    }

    #[test]
    fn ties_keep_earliest_month() {
        let trades = [
            trade_on(2024, 9, 1, 0.02),
            trade_on(2024, 9, 2, 0.02),
            trade_on(2024, 4, 1, 0.01),
            trade_on(2024, 4, 2, 0.01),
        ];
        assert_eq!(best_month(&trades), Some(4));
    }

    #[test]
    fn all_losing_months_have_no_best() {
        let trades = [trade_on(2024, 6, 1, -0.02), trade_on(2024, 6, 3, -0.01)];
        assert_eq!(best_month(&trades), None);
    }
}
