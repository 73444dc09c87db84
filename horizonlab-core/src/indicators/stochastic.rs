//! Stochastic Oscillator (slow form).
//!
//! Raw %K[i] = (close - lowest low) / (highest high - lowest low) * 100 over the
//! trailing `period` bars; a flat range (highest == lowest) reads as 50.
//! Reported %K is the `smooth_k` SMA of raw %K; %D is the `smooth_d` SMA of %K.

use serde::Serialize;

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::{extremes_at, sma_of_series};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stochastic {
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
}

impl Stochastic {
    pub fn new(period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        Self {
            period,
            smooth_k,
            smooth_d,
        }
    }

    /// Unsmoothed %K. NaN before index `period - 1`.
    pub fn raw_k(&self, series: &PriceSeries) -> Vec<f64> {
        let highs = series.highs();
        let lows = series.lows();
        series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| match extremes_at(&highs, &lows, self.period, i) {
                Some((highest, lowest)) if highest == lowest => 50.0,
                Some((highest, lowest)) => (bar.close - lowest) / (highest - lowest) * 100.0,
                None => f64::NAN,
            })
            .collect()
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new(14, 3, 3)
    }
}

impl Indicator for Stochastic {
    type Output = StochasticSeries;

    fn name(&self) -> String {
        format!("stoch_{}_{}_{}", self.period, self.smooth_k, self.smooth_d)
    }

    /// First index where %D is defined.
    fn lookback(&self) -> usize {
        self.period
            .saturating_add(self.smooth_k)
            .saturating_add(self.smooth_d)
            .saturating_sub(3)
    }

    fn compute(&self, series: &PriceSeries) -> StochasticSeries {
        let k = sma_of_series(&self.raw_k(series), self.smooth_k);
        let d = sma_of_series(&k, self.smooth_d);
        StochasticSeries { k, d }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_series, make_series, DEFAULT_EPSILON};

    #[test]
    fn raw_k_known_value() {
        let series = make_ohlc_series(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 14.0, 10.0, 13.0),
            (13.0, 13.5, 9.0, 10.0),
        ]);
        let raw = Stochastic::new(3, 1, 1).raw_k(&series);
        assert!(raw[1].is_nan());
        // highest 14, lowest 8, close 10 → 2/6 * 100
        assert_approx(raw[2], 100.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_range_reads_50() {
        let series = make_ohlc_series(&[(10.0, 10.0, 10.0, 10.0); 5]);
        let out = Stochastic::new(3, 1, 1).compute(&series);
        assert_approx(out.k[2], 50.0, DEFAULT_EPSILON);
        assert_approx(out.d[4], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn smoothing_alignment() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let stoch = Stochastic::default();
        let out = stoch.compute(&make_series(&closes));
        // raw from 13, %K from 15, %D from 17
        assert!(out.k[14].is_nan());
        assert!(!out.k[15].is_nan());
        assert!(out.d[16].is_nan());
        assert!(!out.d[17].is_nan());
        assert_eq!(stoch.lookback(), 17);
    }

    #[test]
    fn k_is_mean_of_raw_k() {
        let closes: Vec<f64> = (0..20).map(|i| 30.0 + ((i * 7) % 5) as f64).collect();
        let stoch = Stochastic::new(5, 3, 3);
        let series = make_series(&closes);
        let raw = stoch.raw_k(&series);
        let out = stoch.compute(&series);
        for i in 6..20 {
            let expected = (raw[i] + raw[i - 1] + raw[i - 2]) / 3.0;
            assert_approx(out.k[i], expected, 1e-9);
        }
    }

    #[test]
    fn values_within_0_100() {
        let closes: Vec<f64> = (0..40).map(|i| 20.0 + (i as f64 * 1.3).cos() * 6.0).collect();
        let out = Stochastic::default().compute(&make_series(&closes));
        for v in out.k.iter().chain(&out.d).filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "out of range: {v}");
        }
    }
}
