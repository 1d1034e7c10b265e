//! Last-two-points trend check.

use crate::error::{Result, SignalError};
use crate::series::TimeSeries;

/// Whether the last present value is strictly above the one before it.
///
/// Missing values are skipped, so the two compared points need not be on
/// adjacent bars.
pub fn higher_last_point(series: &TimeSeries) -> Result<bool> {
    let mut present = series.values().iter().rev().flatten().copied();
    match (present.next(), present.next()) {
        (Some(last), Some(second_last)) => Ok(last > second_last),
        _ => Err(SignalError::InsufficientData {
            context: "higher_last_point",
            required: 2,
            available: series.count_present(),
        }),
    }
}
