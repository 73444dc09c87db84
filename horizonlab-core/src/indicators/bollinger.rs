//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N). Lookback: period - 1.
//! Wherever defined and `mult >= 0`: lower <= middle <= upper.

use serde::Serialize;

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::{sma_of_series, stddev_of_series};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }
}

impl Default for Bollinger {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl Indicator for Bollinger {
    type Output = BollingerBands;

    fn name(&self) -> String {
        format!("bollinger_{}_{}", self.period, self.multiplier)
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &PriceSeries) -> BollingerBands {
        let closes = series.closes();
        let middle = sma_of_series(&closes, self.period);
        let stddev = stddev_of_series(&closes, self.period);

        let n = closes.len();
        let mut upper = vec![f64::NAN; n];
        let mut lower = vec![f64::NAN; n];
        for i in 0..n {
            if middle[i].is_nan() || stddev[i].is_nan() {
                continue;
            }
            let width = self.multiplier * stddev[i];
            upper[i] = middle[i] + width;
            lower[i] = middle[i] - width;
        }

        BollingerBands {
            upper,
            middle,
            lower,
        }
    }
}
