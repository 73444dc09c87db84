//! Strategy keys.
//!
//! One variant per supported trading rule. Dispatch over strategies is a
//! single exhaustive match (see `signals::generate_signals`), so adding a
//! variant without a rule is a compile error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("unknown strategy '{0}' (expected one of: rsi, bollinger, macd, sma20, sma50, sma200, ichimoku, adx)")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKey {
    Rsi,
    Bollinger,
    Macd,
    Sma20,
    Sma50,
    Sma200,
    Ichimoku,
    Adx,
}

/// Human-readable entry and exit rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conditions {
    pub buy: &'static str,
    pub sell: &'static str,
}

impl StrategyKey {
    /// Every strategy, in report order.
    pub const ALL: [StrategyKey; 8] = [
        Self::Rsi,
        Self::Bollinger,
        Self::Macd,
        Self::Sma20,
        Self::Sma50,
        Self::Sma200,
        Self::Ichimoku,
        Self::Adx,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Bollinger => "bollinger",
            Self::Macd => "macd",
            Self::Sma20 => "sma20",
            Self::Sma50 => "sma50",
            Self::Sma200 => "sma200",
            Self::Ichimoku => "ichimoku",
            Self::Adx => "adx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rsi => "RSI (14)",
            Self::Bollinger => "Bollinger Bands",
            Self::Macd => "MACD (12,26,9)",
            Self::Sma20 => "SMA 20",
            Self::Sma50 => "SMA 50",
            Self::Sma200 => "SMA 200",
            Self::Ichimoku => "Ichimoku Cloud",
            Self::Adx => "ADX (14) Trend",
        }
    }

    /// First bar index the signal rule inspects.
    pub fn warmup(self) -> usize {
        match self {
            Self::Rsi | Self::Adx => 14,
            Self::Bollinger | Self::Sma20 => 20,
            Self::Macd => 26,
            Self::Sma50 => 50,
            Self::Sma200 => 200,
            Self::Ichimoku => 52,
        }
    }

    pub fn conditions(self) -> Conditions {
        let (buy, sell) = match self {
            Self::Rsi => (
                "Buy when RSI < 30 (oversold)",
                "Sell when RSI > 70 (overbought) or the target is reached",
            ),
            Self::Bollinger => (
                "Buy when price closes below the lower Bollinger band",
                "Sell when price closes above the upper Bollinger band or the target is reached",
            ),
            Self::Macd => (
                "Buy when MACD crosses above its signal line",
                "Sell when MACD crosses below its signal line or the target is reached",
            ),
            Self::Sma20 => (
                "Buy when price crosses above SMA(20)",
                "Sell when price crosses below SMA(20) or the target is reached",
            ),
            Self::Sma50 => (
                "Buy when price crosses above SMA(50)",
                "Sell when price crosses below SMA(50) or the target is reached",
            ),
            Self::Sma200 => (
                "Buy when price crosses above SMA(200), long-term trend",
                "Sell when price crosses below SMA(200) or the target is reached",
            ),
            Self::Ichimoku => (
                "Buy when price breaks out above the Kumo cloud",
                "Sell when price breaks down below the Kumo cloud or the target is reached",
            ),
            Self::Adx => (
                "Buy when ADX > 20 and +DI crosses above -DI (strong trend)",
                "Sell when +DI crosses below -DI while ADX > 20",
            ),
        };
        Conditions { buy, sell }
    }
}

impl FromStr for StrategyKey {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.key() == wanted)
            .ok_or_else(|| StrategyError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
