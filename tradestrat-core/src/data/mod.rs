//! Table-level data handling: polars conversion and resampling.

pub mod frame;
pub mod resample;

pub use frame::{augment, table_from_dataframe, table_to_dataframe, FrameError};
pub use resample::resample_weekly;
