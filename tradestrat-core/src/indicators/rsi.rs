//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Seed: simple average over the first `period` consecutive price changes.
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0;
//! both zero → 50.
//! A missing change after the seed yields a missing value and leaves the
//! averages untouched.

use super::Indicator;
use crate::error::{require_period, Result};
use crate::series::TimeSeries;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        require_period("rsi period", period)?;
        Ok(Self {
            period,
            name: format!("rsi_{period}"),
        })
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let values = series.values();
        let n = values.len();
        let mut result = vec![None; n];

        // changes[i] = x[i] - x[i-1]
        let mut changes = vec![None; n];
        for i in 1..n {
            if let (Some(curr), Some(prev)) = (values[i], values[i - 1]) {
                changes[i] = Some(curr - prev);
            }
        }

        // Seed on the first run of `period` consecutive present changes.
        let mut run = 0usize;
        let mut seed_end = None;
        for (i, ch) in changes.iter().enumerate().skip(1) {
            if ch.is_some() {
                run += 1;
                if run == self.period {
                    seed_end = Some(i);
                    break;
                }
            } else {
                run = 0;
            }
        }
        let Some(seed_end) = seed_end else {
            return Ok(series.with_values(result));
        };

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for ch in changes[(seed_end + 1 - self.period)..=seed_end].iter().flatten() {
            if *ch > 0.0 {
                avg_gain += ch;
            } else {
                avg_loss -= ch;
            }
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;
        result[seed_end] = Some(compute_rsi(avg_gain, avg_loss));

        // Wilder smoothing for subsequent values
        let alpha = 1.0 / self.period as f64;
        for i in (seed_end + 1)..n {
            let Some(ch) = changes[i] else {
                continue;
            };
            let gain = ch.max(0.0);
            let loss = (-ch).max(0.0);

            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;

            result[i] = Some(compute_rsi(avg_gain, avg_loss));
        }

        Ok(series.with_values(result))
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
