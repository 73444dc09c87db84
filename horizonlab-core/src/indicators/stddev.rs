//! Rolling population standard deviation of close prices.
//!
//! Same alignment as SMA: lookback period - 1.

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::stddev_of_series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = Vec<f64>;

    fn name(&self) -> String {
        format!("stddev_{}", self.period)
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        stddev_of_series(&series.closes(), self.period)
    }
}
