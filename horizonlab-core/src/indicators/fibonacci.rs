//! Fibonacci retracement levels.
//!
//! Not positionally aligned: one static set of levels per call, derived from
//! the single highest high and lowest low over the entire input.
//! price(level) = max_high - (max_high - min_low) * level.

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::indicator::Indicator;

/// Retracement ratios with their display labels.
pub const FIBONACCI_RATIOS: [(f64, &str); 7] = [
    (0.0, "0% (High)"),
    (0.236, "23.6%"),
    (0.382, "38.2%"),
    (0.5, "50%"),
    (0.618, "61.8%"),
    (0.786, "78.6%"),
    (1.0, "100% (Low)"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub max: f64,
    pub min: f64,
    pub levels: Vec<FibonacciLevel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fibonacci;

impl Indicator for Fibonacci {
    type Output = Option<FibonacciLevels>;

    fn name(&self) -> String {
        "fibonacci".to_string()
    }

    fn lookback(&self) -> usize {
        0
    }

    /// `None` for an empty series.
    fn compute(&self, series: &PriceSeries) -> Option<FibonacciLevels> {
        if series.is_empty() {
            return None;
        }

        let max = series
            .bars()
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = series
            .bars()
            .iter()
            .map(|b| b.low)
            .fold(f64::INFINITY, f64::min);
        let range = max - min;

        let levels = FIBONACCI_RATIOS
            .iter()
            .map(|&(ratio, label)| FibonacciLevel {
                ratio,
                // pin the endpoints so they read exactly high / low
                price: if ratio == 1.0 { min } else { max - range * ratio },
                label: label.to_string(),
            })
            .collect();

        Some(FibonacciLevels { max, min, levels })
    }
}
