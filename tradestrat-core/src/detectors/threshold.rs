//! Static threshold check.
//!
//! +1 where the value is strictly above `upper`, -1 where strictly below
//! `lower`, 0 otherwise (including exact equality and missing values).

use crate::error::{require_finite, Result, SignalError};
use crate::series::{DetectorSeries, TimeSeries};

pub fn threshold(series: &TimeSeries, upper: f64, lower: f64) -> Result<DetectorSeries> {
    require_finite("upper", upper)?;
    require_finite("lower", lower)?;
    if upper < lower {
        return Err(SignalError::invalid(
            "upper",
            format!("upper threshold {upper} is below lower threshold {lower}"),
        ));
    }

    let values = series
        .iter()
        .map(|v| {
            Some(match v {
                Some(x) if x > upper => 1,
                Some(x) if x < lower => -1,
                _ => 0,
            })
        })
        .collect();

    Ok(series.with_values(values))
}
