//! Concrete indicator implementations.
//!
//! Single-line indicators (SMA, EMA, StdDev, RSI) return `Vec<f64>`; the
//! multi-line ones return a struct of aligned series. All implement the
//! `Indicator` trait from `crate::indicator`, and the `dispatch` module maps a
//! serializable `IndicatorKind` onto them.

pub mod adx;
pub mod bollinger;
pub mod dispatch;
pub mod ema;
pub mod fibonacci;
pub mod ichimoku;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod smoothing;
pub mod stddev;
pub mod stochastic;

pub use adx::{Adx, AdxSeries};
pub use bollinger::{Bollinger, BollingerBands};
pub use dispatch::{compute_indicator, IndicatorError, IndicatorKind, IndicatorOutput};
pub use ema::Ema;
pub use fibonacci::{Fibonacci, FibonacciLevel, FibonacciLevels};
pub use ichimoku::{Ichimoku, IchimokuSeries};
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stddev::StdDev;
pub use stochastic::{Stochastic, StochasticSeries};

/// Create a synthetic series from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
/// Closes should stay above 1.0 so lows remain positive.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            crate::domain::Bar::new(
                1_704_153_600 + i as i64 * 86_400,
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000,
            )
        })
        .collect();
    crate::domain::PriceSeries::new("TEST", bars).expect("test closes must be > 1.0")
}

/// Create a series from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_series(data: &[(f64, f64, f64, f64)]) -> crate::domain::PriceSeries {
    let bars = data
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            crate::domain::Bar::new(1_704_153_600 + i as i64 * 86_400, open, high, low, close, 1000)
        })
        .collect();
    crate::domain::PriceSeries::new("TEST", bars).expect("test bars must be sane")
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
