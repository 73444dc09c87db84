//! Indicator trait and the named-series container.
//!
//! Indicators are pure functions: a price series in, one or more aligned
//! numeric series out. Every call recomputes from scratch; nothing is cached
//! between calls, so callers may evaluate different slices of the same
//! instrument freely.

use std::collections::BTreeMap;

use crate::domain::PriceSeries;

/// Trait for indicators.
///
/// Series outputs have the same length as the input and use `f64::NAN` as the
/// "undefined (warm-up)" sentinel. The first defined value sits at index
/// `lookback()`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later,
/// with one documented exception: the Ichimoku lagging line, which by
/// definition reads the close `displacement` bars ahead.
pub trait Indicator: Send + Sync {
    type Output;

    /// Human-readable name (e.g., "sma_20", "macd_12_26_9").
    fn name(&self) -> String;

    /// Index of the first defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire series.
    fn compute(&self, series: &PriceSeries) -> Self::Output;
}

/// Named indicator series, ordered by name.
///
/// Used to flatten multi-line outputs (Bollinger, MACD, Ichimoku, ...) into a
/// single table for printing or export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorValues {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value at a specific bar index. NaN (warm-up) values are returned as-is.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
