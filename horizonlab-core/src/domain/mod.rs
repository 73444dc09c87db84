//! Domain types: bars, price series, trades.

pub mod bar;
pub mod series;
pub mod trade;

pub use bar::{Bar, BarError};
pub use series::{PriceSeries, SeriesError};
pub use trade::Trade;
