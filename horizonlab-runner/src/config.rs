//! Screener configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! min_bars = 100
//! min_trades_short = 5
//! min_trades_long = 3
//! top_n = 10
//! pairing = "overlapping"
//! symbols = ["SPY", "QQQ"]
//!
//! [sectors]
//! tech = ["AAPL", "MSFT"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulator::ExitPairing;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Symbols with fewer bars are skipped.
    pub min_bars: usize,
    /// Minimum trades for a short-horizon row to be a candidate.
    pub min_trades_short: usize,
    /// Minimum trades for a long-horizon row to be a candidate.
    pub min_trades_long: usize,
    /// Rows kept per bucket.
    pub top_n: usize,
    pub pairing: ExitPairing,
    pub symbols: Vec<String>,
    /// Sector name → tickers. Tickers here are scanned too.
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_bars: 100,
            min_trades_short: 5,
            min_trades_long: 3,
            top_n: 10,
            pairing: ExitPairing::Overlapping,
            symbols: Vec::new(),
            sectors: BTreeMap::new(),
        }
    }
}

impl ScreenerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be >= 1".into()));
        }
        Ok(())
    }

    /// Explicit symbols followed by sector tickers, first occurrence wins.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut seen = std::collections::BTreeSet::new();
        self.symbols
            .iter()
            .chain(self.sectors.values().flatten())
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }

    /// Sector containing `symbol`, if any.
    pub fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|(_, tickers)| tickers.iter().any(|t| t == symbol))
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ScreenerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScreenerConfig::default());
        assert_eq!(config.min_bars, 100);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn partial_override() {
        let config = ScreenerConfig::from_toml_str(
            "top_n = 3\npairing = \"single_position\"\nsymbols = [\"SPY\"]\n",
        )
        .unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.pairing, ExitPairing::SinglePosition);
        assert_eq!(config.min_trades_short, 5);
        assert_eq!(config.symbols, ["SPY"]);
    }

    #[test]
    fn zero_top_n_rejected() {
        let err = ScreenerConfig::from_toml_str("top_n = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = ScreenerConfig::from_toml_str("top_n = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn sectors_merge_into_symbols() {
        let config = ScreenerConfig::from_toml_str(
            "symbols = [\"AAPL\", \"SPY\"]\n[sectors]\ntech = [\"AAPL\", \"MSFT\"]\n",
        )
        .unwrap();
        assert_eq!(config.all_symbols(), ["AAPL", "SPY", "MSFT"]);
        assert_eq!(config.sector_of("MSFT"), Some("tech"));
        assert_eq!(config.sector_of("SPY"), None);
    }

    #[test]
    fn from_file_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screener.toml");
        let mut config = ScreenerConfig::default();
        config.symbols = vec!["QQQ".into()];
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();
        assert_eq!(ScreenerConfig::from_file(&path).unwrap(), config);

        let missing = ScreenerConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
