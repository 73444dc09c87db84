//! MACD: Moving Average Convergence/Divergence.
//!
//! - MACD line: EMA(fast) - EMA(slow), NaN where either EMA is undefined
//! - Signal line: EMA(signal) of the MACD line (seeded on its first defined values)
//! - Histogram: MACD line - signal line
//!
//! Lookback: slow - 1 for the MACD line, slow + signal - 2 for signal/histogram.

use serde::Serialize;

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::ema_of_series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn name(&self) -> String {
        format!("macd_{}_{}_{}", self.fast, self.slow, self.signal)
    }

    /// First index where the signal line (and histogram) is defined.
    fn lookback(&self) -> usize {
        self.fast.max(self.slow).saturating_add(self.signal).saturating_sub(2)
    }

    fn compute(&self, series: &PriceSeries) -> MacdSeries {
        let closes = series.closes();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd: Vec<f64> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| {
                if f.is_nan() || s.is_nan() {
                    f64::NAN
                } else {
                    f - s
                }
            })
            .collect();

        let signal = ema_of_series(&macd, self.signal);

        // NaN - x is NaN, so the histogram inherits both warm-ups.
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}
