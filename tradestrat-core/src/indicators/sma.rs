//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).
//! A missing value anywhere in the window makes that output missing.

use super::Indicator;
use crate::error::{require_period, Result};
use crate::series::TimeSeries;

/// Trailing arithmetic mean of `period` values.
///
/// Each window is summed afresh, so a large value leaving the window leaves
/// no rounding residue in later means.
pub fn simple_moving_average(series: &TimeSeries, period: usize) -> Result<TimeSeries> {
    require_period("period", period)?;

    let values = series.values();
    let mut result = vec![None; values.len()];
    if values.len() >= period {
        for (window, slot) in values.windows(period).zip(&mut result[period - 1..]) {
            *slot = window
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / period as f64);
        }
    }

    Ok(series.with_values(result))
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        require_period("sma period", period)?;
        Ok(Self {
            period,
            name: format!("sma_{period}"),
        })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries> {
        simple_moving_average(series, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let series = TimeSeries::from_f64(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).unwrap().compute(&series).unwrap();

        assert_eq!(result.len(), 7);
        for i in 0..4 {
            assert!(result.get(i).is_none(), "expected missing at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx(result.get(4).unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result.get(5).unwrap(), 13.0, DEFAULT_EPSILON);
        assert_approx(result.get(6).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let series = TimeSeries::from_f64(&[100.0, 200.0, 300.0]);
        let result = simple_moving_average(&series, 1).unwrap();
        assert_eq!(result.values(), series.values());
    }

    #[test]
    fn sma_missing_propagation() {
        let series = TimeSeries::from_f64(&[10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0]);
        let result = simple_moving_average(&series, 3).unwrap();
        // Windows containing index 2 are missing.
        assert!(result.get(2).is_none());
        assert!(result.get(3).is_none());
        assert!(result.get(4).is_none());
        // Index 5 window [13,14,15] → 14.0
        assert_approx(result.get(5).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_recovers_after_large_value() {
        let series = TimeSeries::from_f64(&[1e17, 1.0, 1.0, 1.0, 1.0]);
        let result = simple_moving_average(&series, 2).unwrap();
        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), Some(5e16));
        for i in 2..5 {
            assert_eq!(result.get(i), Some(1.0), "index {i}");
        }
    }

    #[test]
    fn sma_keeps_index() {
        let series = TimeSeries::from_f64_indexed(vec![5, 7, 9], &[1.0, 2.0, 3.0]).unwrap();
        let result = simple_moving_average(&series, 2).unwrap();
        assert_eq!(result.index(), &[5, 7, 9]);
    }

    #[test]
    fn sma_zero_period_rejected() {
        let series = TimeSeries::from_f64(&[1.0]);
        assert!(matches!(
            simple_moving_average(&series, 0),
            Err(SignalError::InvalidParameter { .. })
        ));
        assert!(Sma::new(0).is_err());
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).unwrap().lookback(), 19);
        assert_eq!(Sma::new(1).unwrap().lookback(), 0);
    }

    #[test]
    fn sma_too_few_values() {
        let series = TimeSeries::from_f64(&[10.0, 11.0]);
        let result = simple_moving_average(&series, 5).unwrap();
        assert_eq!(result.count_present(), 0);
    }
}
