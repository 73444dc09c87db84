//! Ichimoku Cloud (Ichimoku Kinko Hyo).
//!
//! Every line is aligned to the *current* bar index:
//! - tenkan[i]  = midpoint(high/low) over the trailing `conversion` bars
//! - kijun[i]   = midpoint over the trailing `base` bars
//! - span_a[i]  = (tenkan[i - d] + kijun[i - d]) / 2
//! - span_b[i]  = midpoint over the `span_b` bars ending at i - d
//! - lagging[i] = close[i + d]
//!
//! So span A/B at position i hold what a classic chart would have projected
//! onto bar i from bar i - d. The lagging line is the opposite: it reads
//! *future* closes relative to i and is NaN for the last d bars. It is the only
//! series in the engine that looks ahead; never feed it to a signal rule.

use serde::Serialize;

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

use super::smoothing::{midpoint_at, midpoint_series};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IchimokuSeries {
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub span_a: Vec<f64>,
    pub span_b: Vec<f64>,
    pub lagging: Vec<f64>,
}

impl IchimokuSeries {
    /// `max(span_a, span_b)` at `index`, if both spans are defined.
    pub fn cloud_top(&self, index: usize) -> Option<f64> {
        let (a, b) = self.spans_at(index)?;
        Some(a.max(b))
    }

    /// `min(span_a, span_b)` at `index`, if both spans are defined.
    pub fn cloud_bottom(&self, index: usize) -> Option<f64> {
        let (a, b) = self.spans_at(index)?;
        Some(a.min(b))
    }

    fn spans_at(&self, index: usize) -> Option<(f64, f64)> {
        let a = *self.span_a.get(index)?;
        let b = *self.span_b.get(index)?;
        if a.is_nan() || b.is_nan() {
            None
        } else {
            Some((a, b))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ichimoku {
    conversion: usize,
    base: usize,
    span_b: usize,
    displacement: usize,
}

impl Ichimoku {
    pub fn new(conversion: usize, base: usize, span_b: usize, displacement: usize) -> Self {
        Self {
            conversion,
            base,
            span_b,
            displacement,
        }
    }
}

impl Default for Ichimoku {
    fn default() -> Self {
        Self::new(9, 26, 52, 26)
    }
}

impl Indicator for Ichimoku {
    type Output = IchimokuSeries;

    fn name(&self) -> String {
        format!(
            "ichimoku_{}_{}_{}_{}",
            self.conversion, self.base, self.span_b, self.displacement
        )
    }

    /// First index where both cloud spans are defined.
    fn lookback(&self) -> usize {
        let span_a = self.conversion.max(self.base).saturating_sub(1);
        let span_b = self.span_b.saturating_sub(1);
        span_a.max(span_b).saturating_add(self.displacement)
    }

    fn compute(&self, series: &PriceSeries) -> IchimokuSeries {
        let n = series.len();
        let highs = series.highs();
        let lows = series.lows();
        let closes = series.closes();
        let d = self.displacement;

        let tenkan = midpoint_series(&highs, &lows, self.conversion);
        let kijun = midpoint_series(&highs, &lows, self.base);

        let mut span_a = vec![f64::NAN; n];
        let mut span_b = vec![f64::NAN; n];
        for i in d..n {
            let past = i - d;
            // NaN + x stays NaN when either line is still warming up.
            span_a[i] = (tenkan[past] + kijun[past]) / 2.0;
            span_b[i] = midpoint_at(&highs, &lows, self.span_b, past).unwrap_or(f64::NAN);
        }

        let lagging = (0..n)
            .map(|i| {
                i.checked_add(d)
                    .and_then(|j| closes.get(j))
                    .copied()
                    .unwrap_or(f64::NAN)
            })
            .collect();

        IchimokuSeries {
            tenkan,
            kijun,
            span_a,
            span_b,
            lagging,
        }
    }
}
