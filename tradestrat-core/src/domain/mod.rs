//! Domain types: bars, price tables and the final trade signal.

pub mod bar;
pub mod signal;
pub mod table;

pub use bar::Bar;
pub use signal::{Signal, SignalSeries};
pub use table::PriceTable;
