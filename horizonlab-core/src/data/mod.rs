//! Price series sources.

pub mod csv_provider;
pub mod provider;
pub mod synthetic;

pub use csv_provider::CsvProvider;
pub use provider::{require_bars, DataError, SeriesProvider};
pub use synthetic::SyntheticProvider;
