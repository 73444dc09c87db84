//! Relative Strength Index (RSI).
//!
//! Seeds average gain/loss with the plain mean of the first `period` changes,
//! then applies Wilder smoothing: avg = (avg * (period - 1) + value) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period.
//! Edge case: avg_loss == 0 → RSI = 100 (including a completely flat window).

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = Vec<f64>;

    fn name(&self) -> String {
        format!("rsi_{}", self.period)
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        rsi_of_series(&series.closes(), self.period)
    }
}

/// RSI over a plain price series.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return result;
    }

    let gain_loss = |i: usize| {
        let change = values[i] - values[i - 1];
        (change.max(0.0), (-change).max(0.0))
    };

    // Seed: mean gain / mean loss over changes 1..=period
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let (gain, loss) = gain_loss(i);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = compute_rsi(avg_gain, avg_loss);

    let p = period as f64;
    for (i, slot) in result.iter_mut().enumerate().skip(period + 1) {
        let (gain, loss) = gain_loss(i);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        *slot = compute_rsi(avg_gain, avg_loss);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
