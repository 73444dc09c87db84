//! ADX: Average Directional Index (Wilder), with +DI / -DI.
//!
//! Steps:
//! 1. True range and directional movement per bar. Bar 0 has TR = high - low
//!    and no directional movement.
//! 2. Seed at index `period` with the plain *sum* of TR/+DM/-DM over bars
//!    0..period, then S[i] = S[i-1] - S[i-1]/period + V[i].
//! 3. +DI = 100 * S(+DM) / S(TR), -DI likewise (both 0 when S(TR) is 0).
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when the sum is 0.
//! 5. ADX seeds with the mean of the first `period` DX values, then
//!    ADX[i] = (ADX[i-1] * (period - 1) + DX[i]) / period.
//!
//! Lookback: period for the DI lines, 2 * period - 1 for ADX.

use serde::Serialize;

use crate::domain::{Bar, PriceSeries};
use crate::indicator::Indicator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdxSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adx {
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

/// Per-bar true range, +DM and -DM.
fn directional_movement(bars: &[Bar]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut tr = Vec::with_capacity(n);
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
            plus_dm.push(0.0);
            minus_dm.push(0.0);
            continue;
        }
        let prev = &bars[i - 1];
        tr.push(
            (bar.high - bar.low)
                .max((bar.high - prev.close).abs())
                .max((bar.low - prev.close).abs()),
        );

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;
        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    (tr, plus_dm, minus_dm)
}

/// Wilder running sum: seeded at index `period` with sum(values[0..period]),
/// then S[i] = S[i-1] - S[i-1]/period + values[i].
pub fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return result;
    }

    let p = period as f64;
    let mut prev: f64 = values[..period].iter().sum();
    result[period] = prev;
    for i in (period + 1)..n {
        prev = prev - prev / p + values[i];
        result[i] = prev;
    }

    result
}

impl Indicator for Adx {
    type Output = AdxSeries;

    fn name(&self) -> String {
        format!("adx_{}", self.period)
    }

    /// First index where ADX is defined.
    fn lookback(&self) -> usize {
        self.period.saturating_mul(2).saturating_sub(1)
    }

    fn compute(&self, series: &PriceSeries) -> AdxSeries {
        let n = series.len();
        let period = self.period;
        let (tr, plus_dm, minus_dm) = directional_movement(series.bars());

        let smooth_tr = wilder_sum(&tr, period);
        let smooth_plus = wilder_sum(&plus_dm, period);
        let smooth_minus = wilder_sum(&minus_dm, period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if smooth_tr[i].is_nan() {
                continue;
            }
            let (pdi, mdi) = if smooth_tr[i] == 0.0 {
                (0.0, 0.0)
            } else {
                (
                    100.0 * smooth_plus[i] / smooth_tr[i],
                    100.0 * smooth_minus[i] / smooth_tr[i],
                )
            };
            plus_di[i] = pdi;
            minus_di[i] = mdi;
            let di_sum = pdi + mdi;
            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (pdi - mdi).abs() / di_sum
            };
        }

        let mut adx = vec![f64::NAN; n];
        let first = period.saturating_mul(2);
        if period > 0 && n >= first {
            let p = period as f64;
            let mut prev = dx[period..first].iter().sum::<f64>() / p;
            adx[first - 1] = prev;
            for i in first..n {
                prev = (prev * (p - 1.0) + dx[i]) / p;
                adx[i] = prev;
            }
        }

        AdxSeries {
            adx,
            plus_di,
            minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_series, DEFAULT_EPSILON};

    fn sample() -> Vec<(f64, f64, f64, f64)> {
        vec![
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ]
    }

    #[test]
    fn wilder_sum_seed_and_recursion() {
        let result = wilder_sum(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 3.0, DEFAULT_EPSILON); // 1 + 2
        assert_approx(result[3], 3.0 - 1.5 + 4.0, DEFAULT_EPSILON);
        assert_approx(result[4], 5.5 - 2.75 + 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_seed_values() {
        let series = make_ohlc_series(&sample());
        let out = Adx::new(3).compute(&series);

        // TR: 10, 8, 9; +DM: 0, 3, 0; -DM: 0, 0, 2 over bars 0..3
        assert!(out.plus_di[2].is_nan());
        assert_approx(out.plus_di[3], 100.0 * 3.0 / 27.0, 1e-9);
        assert_approx(out.minus_di[3], 100.0 * 2.0 / 27.0, 1e-9);

        assert!(out.adx[4].is_nan());
        assert!(!out.adx[5].is_nan());
    }

    #[test]
    fn adx_bounds() {
        let series = make_ohlc_series(&sample());
        let out = Adx::new(3).compute(&series);
        for (i, &v) in out.adx.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn adx_strong_trend_higher() {
        let data: Vec<_> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0)
            })
            .collect();
        let out = Adx::new(5).compute(&make_ohlc_series(&data));
        let last = *out.adx.last().unwrap();
        assert!(last > 20.0, "ADX should be elevated in strong trend, got {last}");
        assert!(out.plus_di[39] > out.minus_di[39]);
    }

    #[test]
    fn flat_market_has_zero_dx() {
        let out = Adx::new(3).compute(&make_ohlc_series(&[(10.0, 10.0, 10.0, 10.0); 10]));
        assert_approx(out.plus_di[3], 0.0, DEFAULT_EPSILON);
        assert_approx(out.adx[9], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).lookback(), 27);
        assert_eq!(Adx::new(7).lookback(), 13);
    }

    #[test]
    fn adx_too_few_bars() {
        let series = make_ohlc_series(&sample()[..3]);
        let out = Adx::new(3).compute(&series);
        assert!(out.adx.iter().all(|v| v.is_nan()));
        assert!(out.plus_di.iter().all(|v| v.is_nan()));
    }
}
