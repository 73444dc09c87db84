//! Indicator dispatch: a serializable indicator selector plus parameters,
//! mapped onto the concrete implementations.
//!
//! `compute_indicator` is the single entry point used by the CLI and by any
//! caller that picks indicators at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;
use crate::indicator::{Indicator, IndicatorValues};

use super::{
    Adx, AdxSeries, Bollinger, BollingerBands, Ema, Fibonacci, FibonacciLevels, Ichimoku,
    IchimokuSeries, Macd, MacdSeries, Rsi, Sma, StdDev, Stochastic, StochasticSeries,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("unknown indicator '{0}'")]
    UnknownKind(String),

    #[error("invalid parameter for {kind}: {reason}")]
    InvalidParameter { kind: String, reason: String },
}

/// Indicator selector with parameters.
///
/// Serialized as a tagged map, e.g. `{"kind": "bollinger", "period": 20, "multiplier": 2.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma {
        period: usize,
    },
    Ema {
        period: usize,
    },
    #[serde(rename = "stddev")]
    StdDev {
        period: usize,
    },
    Bollinger {
        period: usize,
        multiplier: f64,
    },
    Rsi {
        period: usize,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        period: usize,
        smooth_k: usize,
        smooth_d: usize,
    },
    Ichimoku {
        conversion: usize,
        base: usize,
        span_b: usize,
        displacement: usize,
    },
    Adx {
        period: usize,
    },
    Fibonacci,
}

impl IndicatorKind {
    /// Every selector name accepted by `FromStr`.
    pub const NAMES: [&'static str; 10] = [
        "sma",
        "ema",
        "stddev",
        "bollinger",
        "rsi",
        "macd",
        "stochastic",
        "ichimoku",
        "adx",
        "fibonacci",
    ];

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sma { .. } => "sma",
            Self::Ema { .. } => "ema",
            Self::StdDev { .. } => "stddev",
            Self::Bollinger { .. } => "bollinger",
            Self::Rsi { .. } => "rsi",
            Self::Macd { .. } => "macd",
            Self::Stochastic { .. } => "stochastic",
            Self::Ichimoku { .. } => "ichimoku",
            Self::Adx { .. } => "adx",
            Self::Fibonacci => "fibonacci",
        }
    }

    /// Override the primary lookback period, where the indicator has one.
    ///
    /// MACD, Ichimoku and Fibonacci are left unchanged.
    pub fn with_period(mut self, new_period: usize) -> Self {
        match &mut self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::StdDev { period }
            | Self::Bollinger { period, .. }
            | Self::Rsi { period }
            | Self::Stochastic { period, .. }
            | Self::Adx { period } => *period = new_period,
            Self::Macd { .. } | Self::Ichimoku { .. } | Self::Fibonacci => {}
        }
        self
    }

    /// Override the Bollinger band multiplier. No-op for other kinds.
    pub fn with_multiplier(mut self, new_multiplier: f64) -> Self {
        if let Self::Bollinger { multiplier, .. } = &mut self {
            *multiplier = new_multiplier;
        }
        self
    }

    /// Reject zero periods and negative or non-finite multipliers.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods: Vec<(&str, usize)> = match self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::StdDev { period }
            | Self::Rsi { period }
            | Self::Adx { period } => vec![("period", *period)],
            Self::Bollinger { period, .. } => vec![("period", *period)],
            Self::Macd { fast, slow, signal } => {
                vec![("fast", *fast), ("slow", *slow), ("signal", *signal)]
            }
            Self::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => vec![
                ("period", *period),
                ("smooth_k", *smooth_k),
                ("smooth_d", *smooth_d),
            ],
            Self::Ichimoku {
                conversion,
                base,
                span_b,
                ..
            } => vec![
                ("conversion", *conversion),
                ("base", *base),
                ("span_b", *span_b),
            ],
            Self::Fibonacci => vec![],
        };

        if let Some((field, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(IndicatorError::InvalidParameter {
                kind: self.kind_name().to_string(),
                reason: format!("{field} must be >= 1"),
            });
        }

        if let Self::Bollinger { multiplier, .. } = self {
            if !multiplier.is_finite() || *multiplier < 0.0 {
                return Err(IndicatorError::InvalidParameter {
                    kind: self.kind_name().to_string(),
                    reason: format!("multiplier must be finite and >= 0, got {multiplier}"),
                });
            }
        }

        Ok(())
    }

    /// Base name used for flattened series, e.g. "bollinger_20_2".
    pub fn name(&self) -> String {
        match *self {
            Self::Sma { period } => Sma::new(period).name(),
            Self::Ema { period } => Ema::new(period).name(),
            Self::StdDev { period } => StdDev::new(period).name(),
            Self::Bollinger { period, multiplier } => Bollinger::new(period, multiplier).name(),
            Self::Rsi { period } => Rsi::new(period).name(),
            Self::Macd { fast, slow, signal } => Macd::new(fast, slow, signal).name(),
            Self::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => Stochastic::new(period, smooth_k, smooth_d).name(),
            Self::Ichimoku {
                conversion,
                base,
                span_b,
                displacement,
            } => Ichimoku::new(conversion, base, span_b, displacement).name(),
            Self::Adx { period } => Adx::new(period).name(),
            Self::Fibonacci => Fibonacci.name(),
        }
    }
}

/// Standard parameters for each indicator name.
impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "sma" => Self::Sma { period: 20 },
            "ema" => Self::Ema { period: 20 },
            "stddev" => Self::StdDev { period: 20 },
            "bollinger" => Self::Bollinger {
                period: 20,
                multiplier: 2.0,
            },
            "rsi" => Self::Rsi { period: 14 },
            "macd" => Self::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
            },
            "stochastic" => Self::Stochastic {
                period: 14,
                smooth_k: 3,
                smooth_d: 3,
            },
            "ichimoku" => Self::Ichimoku {
                conversion: 9,
                base: 26,
                span_b: 52,
                displacement: 26,
            },
            "adx" => Self::Adx { period: 14 },
            "fibonacci" => Self::Fibonacci,
            other => return Err(IndicatorError::UnknownKind(other.to_string())),
        };
        Ok(kind)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Result of `compute_indicator`, one variant per output shape.
///
/// Output only: serde_json writes NaN warm-up values as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum IndicatorOutput {
    Line(Vec<f64>),
    Bollinger(BollingerBands),
    Macd(MacdSeries),
    Stochastic(StochasticSeries),
    Ichimoku(IchimokuSeries),
    Adx(AdxSeries),
    Fibonacci(Option<FibonacciLevels>),
}

impl IndicatorOutput {
    /// Flatten into named, positionally aligned series.
    ///
    /// Multi-line outputs get a suffix per line (`{base}_upper`, `{base}_signal`,
    /// ...). Fibonacci has no aligned series and yields an empty container.
    pub fn named_series(&self, base: &str) -> IndicatorValues {
        let mut values = IndicatorValues::new();
        let mut put = |suffix: &str, series: &[f64]| {
            let name = if suffix.is_empty() {
                base.to_string()
            } else {
                format!("{base}_{suffix}")
            };
            values.insert(name, series.to_vec());
        };

        match self {
            Self::Line(series) => put("", series),
            Self::Bollinger(b) => {
                put("upper", &b.upper);
                put("middle", &b.middle);
                put("lower", &b.lower);
            }
            Self::Macd(m) => {
                put("line", &m.macd);
                put("signal", &m.signal);
                put("histogram", &m.histogram);
            }
            Self::Stochastic(s) => {
                put("k", &s.k);
                put("d", &s.d);
            }
            Self::Ichimoku(i) => {
                put("tenkan", &i.tenkan);
                put("kijun", &i.kijun);
                put("span_a", &i.span_a);
                put("span_b", &i.span_b);
                put("lagging", &i.lagging);
            }
            Self::Adx(a) => {
                put("adx", &a.adx);
                put("plus_di", &a.plus_di);
                put("minus_di", &a.minus_di);
            }
            Self::Fibonacci(_) => {}
        }

        values
    }
}

/// Validate `kind` and compute it over `series`.
pub fn compute_indicator(
    kind: &IndicatorKind,
    series: &PriceSeries,
) -> Result<IndicatorOutput, IndicatorError> {
    kind.validate()?;

    let output = match *kind {
        IndicatorKind::Sma { period } => IndicatorOutput::Line(Sma::new(period).compute(series)),
        IndicatorKind::Ema { period } => IndicatorOutput::Line(Ema::new(period).compute(series)),
        IndicatorKind::StdDev { period } => {
            IndicatorOutput::Line(StdDev::new(period).compute(series))
        }
        IndicatorKind::Bollinger { period, multiplier } => {
            IndicatorOutput::Bollinger(Bollinger::new(period, multiplier).compute(series))
        }
        IndicatorKind::Rsi { period } => IndicatorOutput::Line(Rsi::new(period).compute(series)),
        IndicatorKind::Macd { fast, slow, signal } => {
            IndicatorOutput::Macd(Macd::new(fast, slow, signal).compute(series))
        }
        IndicatorKind::Stochastic {
            period,
            smooth_k,
            smooth_d,
        } => IndicatorOutput::Stochastic(
            Stochastic::new(period, smooth_k, smooth_d).compute(series),
        ),
        IndicatorKind::Ichimoku {
            conversion,
            base,
            span_b,
            displacement,
        } => IndicatorOutput::Ichimoku(
            Ichimoku::new(conversion, base, span_b, displacement).compute(series),
        ),
        IndicatorKind::Adx { period } => IndicatorOutput::Adx(Adx::new(period).compute(series)),
        IndicatorKind::Fibonacci => IndicatorOutput::Fibonacci(Fibonacci.compute(series)),
    };

    Ok(output)
}
