//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = (close[t] - EMA[t-1]) * k + EMA[t-1], k = 2 / (period + 1).
//! Seed: EMA[period-1] = SMA of the first `period` closes.
//! Lookback: period - 1.

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::ema_of_series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    type Output = Vec<f64>;

    fn name(&self) -> String {
        format!("ema_{}", self.period)
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        ema_of_series(&series.closes(), self.period)
    }
}
