//! Gradient-sign agreement across several series.
//!
//! The gradient of each series is its first difference (bar spacing is 1).
//! +1 where every difference is ≥ 0, -1 where every difference is < 0,
//! 0 where signs are mixed or any difference is missing. Bar 0 is missing.

use crate::error::{Result, SignalError};
use crate::series::{ensure_all_aligned, DetectorSeries, TimeSeries};

/// `x[i] - x[i-1]`; missing on bar 0 and wherever either side is missing.
pub fn first_difference(series: &TimeSeries) -> TimeSeries {
    let values = series
        .iter()
        .enumerate()
        .map(|(i, curr)| {
            let prev = i.checked_sub(1).and_then(|p| series.get(p));
            Some(curr? - prev?)
        })
        .collect();
    series.with_values(values)
}

pub fn gradient_sign(series_set: &[&TimeSeries]) -> Result<DetectorSeries> {
    if series_set.len() < 2 {
        return Err(SignalError::invalid(
            "series_set",
            format!("needs at least 2 series, got {}", series_set.len()),
        ));
    }
    ensure_all_aligned(series_set, "gradient_sign")?;

    let diffs: Vec<TimeSeries> = series_set.iter().map(|s| first_difference(s)).collect();
    let first = series_set[0];

    let values = (0..first.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let at_bar: Option<Vec<f64>> = diffs.iter().map(|d| d.get(i)).collect();
            let Some(at_bar) = at_bar else {
                return Some(0);
            };
            if at_bar.iter().all(|&d| d >= 0.0) {
                Some(1)
            } else if at_bar.iter().all(|&d| d < 0.0) {
                Some(-1)
            } else {
                Some(0)
            }
        })
        .collect();

    Ok(first.with_values(values))
}
