//! HorizonLab Core: domain types, indicator engine, price series providers.
//!
//! This crate contains everything that is pure data and pure math:
//! - Domain types (bars, price series, trades)
//! - The `Indicator` trait and the indicator implementations
//! - A runtime dispatcher over a serializable `IndicatorKind`
//! - The `SeriesProvider` seam with CSV and synthetic sources
//!
//! The backtest engine lives in `horizonlab-runner`.

pub mod data;
pub mod domain;
pub mod indicator;
pub mod indicators;

pub use domain::{Bar, PriceSeries, Trade};
pub use indicator::{Indicator, IndicatorValues};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and indicator types are Send + Sync, so the
    /// runner can fan out across symbols and strategies with rayon.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<IndicatorValues>();
        require_sync::<IndicatorValues>();

        require_send::<indicators::IndicatorKind>();
        require_sync::<indicators::IndicatorKind>();
        require_send::<indicators::IndicatorOutput>();
        require_sync::<indicators::IndicatorOutput>();

        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
    }

    /// Providers are usable as trait objects.
    #[test]
    fn providers_are_object_safe() {
        let providers: Vec<Box<dyn data::SeriesProvider>> = vec![
            Box::new(data::SyntheticProvider::new(10)),
            Box::new(data::CsvProvider::new(".")),
        ];
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["synthetic", "csv"]);
    }
}
