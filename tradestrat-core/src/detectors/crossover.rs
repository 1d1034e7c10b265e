//! Series-vs-series crossover.
//!
//! +1 on the bar where `lead` moves from at-or-below `trailing` to above it,
//! -1 on the bar where it moves from above to at-or-below, 0 otherwise.
//! Bar 0 is always 0.

use crate::error::Result;
use crate::series::{DetectorSeries, FlagSeries, TimeSeries};

/// Discrete derivative of the "lead above trailing" indicator.
pub fn crossover(lead: &TimeSeries, trailing: &TimeSeries) -> Result<DetectorSeries> {
    lead.ensure_aligned(trailing, "crossover")?;

    let n = lead.len();
    let mut result = vec![Some(0i8); n];

    for i in 1..n {
        let (Some(l0), Some(t0), Some(l1), Some(t1)) = (
            lead.get(i - 1),
            trailing.get(i - 1),
            lead.get(i),
            trailing.get(i),
        ) else {
            continue;
        };
        if l1 > t1 && l0 <= t0 {
            result[i] = Some(1);
        } else if l1 <= t1 && l0 > t0 {
            result[i] = Some(-1);
        }
    }

    Ok(lead.with_values(result))
}

/// Per-bar `lead > trailing`; missing on either side gives `false`.
pub fn strictly_above(lead: &TimeSeries, trailing: &TimeSeries) -> Result<FlagSeries> {
    lead.ensure_aligned(trailing, "strictly_above")?;
    let values = lead
        .iter()
        .zip(trailing.iter())
        .map(|pair| match pair {
            (Some(l), Some(t)) => Some(l > t),
            _ => Some(false),
        })
        .collect();
    Ok(lead.with_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;

    fn s(values: &[f64]) -> TimeSeries {
        TimeSeries::from_f64(values)
    }

    #[test]
    fn detects_cross_up_and_down() {
        let lead = s(&[1.0, 2.0, 4.0, 5.0, 2.0, 1.0]);
        let trailing = s(&[3.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
        let out = crossover(&lead, &trailing).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 0, 1, 0, -1, 0]);
    }

    #[test]
    fn touching_is_not_above() {
        // lead == trailing counts as "not above"
        let lead = s(&[3.0, 3.0, 4.0, 3.0]);
        let trailing = s(&[3.0, 3.0, 3.0, 3.0]);
        let out = crossover(&lead, &trailing).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 0, 1, -1]);
    }

    #[test]
    fn first_bar_is_zero_even_when_above() {
        let out = crossover(&s(&[10.0, 10.0]), &s(&[1.0, 1.0])).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 0]);
    }

    #[test]
    fn missing_values_do_not_fire() {
        let lead = s(&[f64::NAN, 5.0, 1.0, f64::NAN, 5.0]);
        let trailing = s(&[3.0; 5]);
        let out = crossover(&lead, &trailing).unwrap();
        // 0→1 needs a present previous bar: bar 1 and bar 4 cannot fire.
        assert_eq!(out.to_i8_vec(), vec![0, 0, -1, 0, 0]);
    }

    #[test]
    fn misaligned_inputs_rejected() {
        let err = crossover(&s(&[1.0, 2.0]), &s(&[1.0])).unwrap_err();
        assert!(matches!(err, SignalError::MisalignedInput { .. }));
    }

    #[test]
    fn strictly_above_flags() {
        let out = strictly_above(&s(&[1.0, 5.0, f64::NAN]), &s(&[2.0, 2.0, 2.0])).unwrap();
        assert_eq!(out.to_bool_vec(), vec![false, true, false]);
    }
}
