//! Smoothing and rolling-window primitives over plain numeric series.
//!
//! These work on `&[f64]` rather than bars so composed indicators (MACD
//! signal line, stochastic %K/%D) can reuse them on derived series. NaN is the
//! "undefined" sentinel throughout.

/// Rolling arithmetic mean. A window containing NaN yields NaN.
///
/// First defined value at index `period - 1`. `period == 0` yields all NaN.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}

/// Exponential moving average with `k = 2 / (period + 1)`.
///
/// Leading NaN values are skipped: the seed is the SMA of the first `period`
/// defined values and lands on the last of them. After the seed,
/// `ema[i] = (value[i] - ema[i-1]) * k + ema[i-1]`. A NaN after the seed
/// makes the rest of the series NaN.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(s) => s,
        None => return result,
    };
    let seed_end = match start.checked_add(period) {
        Some(end) if end <= n => end,
        _ => return result,
    };

    let seed_window = &values[start..seed_end];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = seed_window.iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = prev;

    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = (values[i] - prev) * k + prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// Population standard deviation over a trailing window, around the window mean.
pub fn stddev_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let means = sma_of_series(values, period);
    let mut result = vec![f64::NAN; values.len()];

    for (i, &mean) in means.iter().enumerate() {
        if mean.is_nan() {
            continue;
        }
        let window = &values[(i + 1 - period)..=i];
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        result[i] = variance.sqrt();
    }

    result
}

/// `(highest high + lowest low) / 2` over the trailing `period` bars ending at `index`.
///
/// `None` before warm-up or when the window is out of range.
pub fn midpoint_at(highs: &[f64], lows: &[f64], period: usize, index: usize) -> Option<f64> {
    let (highest, lowest) = extremes_at(highs, lows, period, index)?;
    Some((highest + lowest) / 2.0)
}

/// `(highest high, lowest low)` over the trailing `period` bars ending at `index`.
pub fn extremes_at(highs: &[f64], lows: &[f64], period: usize, index: usize) -> Option<(f64, f64)> {
    if period == 0 || index >= highs.len() || index >= lows.len() || index + 1 < period {
        return None;
    }
    let start = index + 1 - period;
    let highest = highs[start..=index]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows[start..=index]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    Some((highest, lowest))
}

/// Rolling midpoint series. NaN before index `period - 1`.
pub fn midpoint_series(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    (0..highs.len())
        .map(|i| midpoint_at(highs, lows, period, i).unwrap_or(f64::NAN))
        .collect()
}
