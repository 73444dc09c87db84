//! Signal generation: strategy key + price series → entry/exit bar indices.
//!
//! Rules only ever compare values at the current and previous bar, and a NaN
//! (warm-up) value never matches any rule.

use serde::{Deserialize, Serialize};

use horizonlab_core::indicator::Indicator;
use horizonlab_core::indicators::{Adx, Bollinger, Ichimoku, Macd, Rsi, Sma};
use horizonlab_core::PriceSeries;

use crate::strategy::StrategyKey;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const ADX_TREND_THRESHOLD: f64 = 20.0;

/// Entry and exit bar indices, each strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub entries: Vec<usize>,
    pub exits: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Indices `>= start` where `values[i]` is defined and satisfies `predicate`.
pub fn find_conditions(values: &[f64], start: usize, predicate: impl Fn(f64) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .skip(start)
        .filter(|(_, v)| !v.is_nan() && predicate(**v))
        .map(|(i, _)| i)
        .collect()
}

/// Indices `>= start` where `a` crosses `b`.
///
/// Up: `a[i-1] <= b[i-1]` and `a[i] > b[i]`. Down: `a[i-1] >= b[i-1]` and
/// `a[i] < b[i]`. Skipped when either series is NaN at the previous bar.
pub fn find_crossovers(a: &[f64], b: &[f64], direction: Direction, start: usize) -> Vec<usize> {
    let n = a.len().min(b.len());
    (start.max(1)..n)
        .filter(|&i| {
            let (pa, pb) = (a[i - 1], b[i - 1]);
            if pa.is_nan() || pb.is_nan() {
                return false;
            }
            match direction {
                Direction::Up => pa <= pb && a[i] > b[i],
                Direction::Down => pa >= pb && a[i] < b[i],
            }
        })
        .collect()
}

fn price_vs_sma(series: &PriceSeries, period: usize, start: usize) -> SignalSet {
    let closes = series.closes();
    let sma = Sma::new(period).compute(series);
    SignalSet {
        entries: find_crossovers(&closes, &sma, Direction::Up, start),
        exits: find_crossovers(&closes, &sma, Direction::Down, start),
    }
}

/// Compute the entry/exit signals of `strategy` over `series`.
///
/// A series shorter than the strategy's warm-up yields an empty set.
pub fn generate_signals(series: &PriceSeries, strategy: StrategyKey) -> SignalSet {
    let start = strategy.warmup();
    let closes = series.closes();
    let n = series.len();

    match strategy {
        StrategyKey::Rsi => {
            let rsi = Rsi::new(14).compute(series);
            SignalSet {
                entries: find_conditions(&rsi, start, |v| v < RSI_OVERSOLD),
                exits: find_conditions(&rsi, start, |v| v > RSI_OVERBOUGHT),
            }
        }
        StrategyKey::Bollinger => {
            let bands = Bollinger::new(20, 2.0).compute(series);
            let mut signals = SignalSet::default();
            for i in start..n {
                if closes[i] < bands.lower[i] {
                    signals.entries.push(i);
                }
                if closes[i] > bands.upper[i] {
                    signals.exits.push(i);
                }
            }
            signals
        }
        StrategyKey::Macd => {
            let macd = Macd::new(12, 26, 9).compute(series);
            SignalSet {
                entries: find_crossovers(&macd.macd, &macd.signal, Direction::Up, start),
                exits: find_crossovers(&macd.macd, &macd.signal, Direction::Down, start),
            }
        }
        StrategyKey::Sma20 => price_vs_sma(series, 20, start),
        StrategyKey::Sma50 => price_vs_sma(series, 50, start),
        StrategyKey::Sma200 => price_vs_sma(series, 200, start),
        StrategyKey::Ichimoku => {
            let ichimoku = Ichimoku::default().compute(series);
            let mut signals = SignalSet::default();
            for i in start.max(1)..n {
                let (prev, close) = (closes[i - 1], closes[i]);
                // cloud not formed yet
                let (Some(top), Some(bottom)) = (ichimoku.cloud_top(i), ichimoku.cloud_bottom(i))
                else {
                    continue;
                };
                if prev <= top && close > top {
                    signals.entries.push(i);
                }
                if prev >= bottom && close < bottom {
                    signals.exits.push(i);
                }
            }
            signals
        }
        StrategyKey::Adx => {
            let adx = Adx::new(14).compute(series);
            let mut signals = SignalSet::default();
            for i in start.max(1)..n {
                let window = [
                    adx.adx[i],
                    adx.plus_di[i],
                    adx.minus_di[i],
                    adx.plus_di[i - 1],
                    adx.minus_di[i - 1],
                ];
                if window.iter().any(|v| v.is_nan()) || adx.adx[i] <= ADX_TREND_THRESHOLD {
                    continue;
                }
                let (prev_plus, prev_minus) = (adx.plus_di[i - 1], adx.minus_di[i - 1]);
                let (plus, minus) = (adx.plus_di[i], adx.minus_di[i]);
                if prev_plus <= prev_minus && plus > minus {
                    signals.entries.push(i);
                }
                if prev_plus >= prev_minus && plus < minus {
                    signals.exits.push(i);
                }
            }
            signals
        }
    }
}
