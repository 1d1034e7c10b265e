//! Exponential Moving Average (EMA).
//!
//! alpha = 2 / (period + 1). The average is the decay-weighted mean of every
//! observation seen so far, kept as a running numerator and denominator:
//!   num[t] = x[t] + (1 - alpha) * num[t-1]
//!   den[t] = 1    + (1 - alpha) * den[t-1]
//!   EMA[t] = num[t] / den[t]
//! Output is missing until `period` observations have been seen.
//! A missing observation decays the existing weights without adding one,
//! and its own output is missing.

use super::Indicator;
use crate::error::{require_period, Result};
use crate::series::TimeSeries;

/// EMA with minimum-periods warm-up.
pub fn exponential_moving_average(series: &TimeSeries, period: usize) -> Result<TimeSeries> {
    require_period("period", period)?;

    let alpha = 2.0 / (period as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut num = 0.0;
    let mut den = 0.0;
    let mut seen = 0usize;

    let result = series
        .iter()
        .map(|value| match value {
            Some(x) => {
                num = x + decay * num;
                den = 1.0 + decay * den;
                seen += 1;
                (seen >= period).then(|| num / den)
            }
            None => {
                num *= decay;
                den *= decay;
                None
            }
        })
        .collect();

    Ok(series.with_values(result))
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        require_period("ema period", period)?;
        Ok(Self {
            period,
            name: format!("ema_{period}"),
        })
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries> {
        exponential_moving_average(series, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_is_identity() {
        let series = TimeSeries::from_f64(&[100.0, 200.0, 300.0]);
        let result = exponential_moving_average(&series, 1).unwrap();
        assert_approx(result.get(0).unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(result.get(1).unwrap(), 200.0, DEFAULT_EPSILON);
        assert_approx(result.get(2).unwrap(), 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, decay = 0.5
        // t0: num=10,   den=1
        // t1: num=16,   den=1.5
        // t2: num=20,   den=1.75   → 11.428571...
        // t3: num=23,   den=1.875  → 12.266666...
        // t4: num=25.5, den=1.9375 → 13.161290...
        let series = TimeSeries::from_f64(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).unwrap().compute(&series).unwrap();

        assert!(result.get(0).is_none());
        assert!(result.get(1).is_none());
        assert_approx(result.get(2).unwrap(), 20.0 / 1.75, DEFAULT_EPSILON);
        assert_approx(result.get(3).unwrap(), 23.0 / 1.875, DEFAULT_EPSILON);
        assert_approx(result.get(4).unwrap(), 25.5 / 1.9375, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let series = TimeSeries::from_f64(&[7.0; 30]);
        let result = exponential_moving_average(&series, 10).unwrap();
        for i in 9..30 {
            assert_approx(result.get(i).unwrap(), 7.0, 1e-12);
        }
    }

    #[test]
    fn ema_missing_bar_is_missing_and_skipped() {
        let series = TimeSeries::from_f64(&[10.0, 11.0, 12.0, f64::NAN, 14.0]);
        let result = exponential_moving_average(&series, 3).unwrap();
        assert!(result.get(2).is_some());
        assert!(result.get(3).is_none());
        // t3 decays: num=10, den=0.875; t4: num=19, den=1.4375
        assert_approx(result.get(4).unwrap(), 19.0 / 1.4375, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_warmup_counts_observations_not_bars() {
        let series = TimeSeries::from_f64(&[f64::NAN, f64::NAN, 5.0, 5.0, 5.0]);
        let result = exponential_moving_average(&series, 3).unwrap();
        assert!(result.get(3).is_none());
        assert_approx(result.get(4).unwrap(), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_zero_period_rejected() {
        let series = TimeSeries::from_f64(&[1.0]);
        assert!(matches!(
            exponential_moving_average(&series, 0),
            Err(SignalError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(20).unwrap().lookback(), 19);
    }
}
