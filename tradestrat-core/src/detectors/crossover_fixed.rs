//! Fixed-threshold crossover.
//!
//! Two independent sub-events, summed:
//! - low band:  `lead` crosses up through `low`  (≤ low → > low)   → +1
//! - high band: `lead` crosses down through `high` (≥ high → < high) → -1
//!
//! Same-direction transitions of each band (falling back below `low`,
//! rising back above `high`) are discarded. Because `low < high`, one bar
//! can trigger at most one of the two.

use crate::error::{require_finite, Result, SignalError};
use crate::series::{DetectorSeries, TimeSeries};

pub fn crossover_fixed(lead: &TimeSeries, low: f64, high: f64) -> Result<DetectorSeries> {
    require_finite("low", low)?;
    require_finite("high", high)?;
    if low >= high {
        return Err(SignalError::invalid(
            "low",
            format!("low threshold {low} must be below high threshold {high}"),
        ));
    }

    let n = lead.len();
    let mut result = vec![Some(0i8); n];

    for i in 1..n {
        let (Some(prev), Some(curr)) = (lead.get(i - 1), lead.get(i)) else {
            continue;
        };
        let low_cross = i8::from(prev <= low && curr > low);
        let high_cross = -i8::from(prev >= high && curr < high);
        result[i] = Some(low_cross + high_cross);
    }

    Ok(lead.with_values(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(values: &[f64]) -> TimeSeries {
        TimeSeries::from_f64(values)
    }

    #[test]
    fn single_low_cross_up() {
        let out = crossover_fixed(&s(&[10.0, 25.0, 30.0, 15.0, 5.0]), 20.0, 80.0).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1, 0, 0, 0]);
    }

    #[test]
    fn single_high_cross_down() {
        let out = crossover_fixed(&s(&[50.0, 85.0, 90.0, 70.0, 95.0]), 20.0, 80.0).unwrap();
        // 90 → 70 crosses down through 80; 70 → 95 is a same-direction rise and is dropped.
        assert_eq!(out.to_i8_vec(), vec![0, 0, 0, -1, 0]);
    }

    #[test]
    fn starting_on_threshold_counts_as_at_or_below() {
        let out = crossover_fixed(&s(&[20.0, 21.0]), 20.0, 80.0).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1]);
        let out = crossover_fixed(&s(&[80.0, 79.0]), 20.0, 80.0).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, -1]);
    }

    #[test]
    fn full_swing_fires_both_bands() {
        let out = crossover_fixed(&s(&[10.0, 90.0, 10.0]), 20.0, 80.0).unwrap();
        // 10 → 90 crosses up through low; 90 → 10 crosses down through high.
        assert_eq!(out.to_i8_vec(), vec![0, 1, -1]);
    }

    #[test]
    fn warmup_end_does_not_fire() {
        let out = crossover_fixed(&s(&[f64::NAN, f64::NAN, 50.0, 55.0]), 20.0, 80.0).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn rejects_inverted_or_equal_thresholds() {
        let lead = s(&[1.0]);
        assert!(matches!(
            crossover_fixed(&lead, 80.0, 20.0),
            Err(SignalError::InvalidParameter { .. })
        ));
        assert!(crossover_fixed(&lead, 50.0, 50.0).is_err());
        assert!(crossover_fixed(&lead, f64::NAN, 50.0).is_err());
    }
}
