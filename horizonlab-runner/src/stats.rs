//! Trade statistics.

use serde::{Deserialize, Serialize};

use horizonlab_core::Trade;

/// Aggregate statistics over a trade list.
///
/// Percent fields are in percentage points: `win_rate` 0..=100, `avg_return`
/// / `max_win` / `max_loss` are `100 * pnl`. An empty trade list gives the
/// all-zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub max_win: f64,
    pub max_loss: f64,
    pub trades: Vec<Trade>,
}

impl Stats {
    /// Reduce `trades` in a single pass.
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        let count = trades.len();
        if count == 0 {
            return Self::default();
        }

        let mut wins = 0;
        let mut sum = 0.0;
        let mut max_win: f64 = 0.0;
        let mut max_loss: f64 = 0.0;
        for trade in &trades {
            if trade.is_winner() {
                wins += 1;
            }
            sum += trade.pnl;
            max_win = max_win.max(trade.pnl);
            max_loss = max_loss.min(trade.pnl);
        }

        Self {
            count,
            wins,
            losses: count - wins,
            win_rate: wins as f64 / count as f64 * 100.0,
            avg_return: sum / count as f64 * 100.0,
            max_win: max_win * 100.0,
            max_loss: max_loss * 100.0,
            trades,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `avg_return * count`: the summed percent return of every trade.
    pub fn total_return(&self) -> f64 {
        self.avg_return * self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(pnl: f64) -> Trade {
        Trade {
            entry_index: 0,
            entry_date: 0,
            entry_price: 100.0,
            exit_index: 1,
            exit_date: 86_400,
            exit_price: 100.0 * (1.0 + pnl),
            days: 1,
            pnl,
        }
    }

    #[test]
    fn empty_is_all_zero() {
        let stats = Stats::from_trades(vec![]);
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.trades.is_empty());
        assert_eq!(stats.total_return(), 0.0);
    }

    #[test]
    fn mixed_trades() {
        let stats = Stats::from_trades(vec![trade(0.10), trade(-0.05), trade(0.0), trade(0.03)]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 2); // zero pnl counts as a loss
        assert!((stats.win_rate - 50.0).abs() < 1e-12);
        assert!((stats.avg_return - 2.0).abs() < 1e-9);
        assert!((stats.max_win - 10.0).abs() < 1e-9);
        assert!((stats.max_loss + 5.0).abs() < 1e-9);
        assert!((stats.total_return() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn all_losers_have_zero_max_win() {
        let stats = Stats::from_trades(vec![trade(-0.02), trade(-0.04)]);
        assert_eq!(stats.max_win, 0.0);
        assert!((stats.max_loss + 4.0).abs() < 1e-9);
        assert_eq!(stats.win_rate, 0.0);
    }
}
