//! Stochastic RSI.
//!
//! stoch[t] = 100 * (rsi[t] - min(rsi, length)) / (max(rsi, length) - min(rsi, length))
//! %K = SMA(stoch, k), %D = SMA(%K, d).
//!
//! Produces two series (exposed as separate Indicator instances per band).
//! A window with zero range, or any missing RSI value, yields a missing
//! stochastic value.
//! Lookback: rsi_length + (length - 1) + (k - 1) for %K, plus (d - 1) for %D.

use super::rsi::Rsi;
use super::sma::simple_moving_average;
use super::Indicator;
use crate::error::{require_period, Result};
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};

/// Stochastic RSI parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StochRsiParams {
    /// Window of the min/max stochastic over RSI.
    pub length: usize,
    /// RSI period.
    pub rsi_length: usize,
    /// %K smoothing period.
    pub k: usize,
    /// %D smoothing period.
    pub d: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            length: 14,
            rsi_length: 14,
            k: 3,
            d: 3,
        }
    }
}

impl StochRsiParams {
    pub fn validate(&self) -> Result<()> {
        require_period("stoch length", self.length)?;
        require_period("stoch rsi length", self.rsi_length)?;
        require_period("stoch k", self.k)?;
        require_period("stoch d", self.d)
    }
}

/// Which band of the stochastic RSI to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochRsiBand {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct StochRsi {
    params: StochRsiParams,
    band: StochRsiBand,
    name: String,
}

impl StochRsi {
    pub fn k(params: StochRsiParams) -> Result<Self> {
        Self::new(params, StochRsiBand::K)
    }

    pub fn d(params: StochRsiParams) -> Result<Self> {
        Self::new(params, StochRsiBand::D)
    }

    fn new(params: StochRsiParams, band: StochRsiBand) -> Result<Self> {
        params.validate()?;
        let tag = match band {
            StochRsiBand::K => "k",
            StochRsiBand::D => "d",
        };
        Ok(Self {
            params,
            band,
            name: format!(
                "stochrsi_{tag}_{}_{}_{}_{}",
                params.length, params.rsi_length, params.k, params.d
            ),
        })
    }

    /// Both bands in one pass: `(%K, %D)`.
    pub fn compute_bands(params: StochRsiParams, close: &TimeSeries) -> Result<(TimeSeries, TimeSeries)> {
        params.validate()?;
        let rsi = Rsi::new(params.rsi_length)?.compute(close)?;
        let stoch = stochastic(&rsi, params.length);
        let k = simple_moving_average(&stoch, params.k)?;
        let d = simple_moving_average(&k, params.d)?;
        Ok((k, d))
    }
}

impl Indicator for StochRsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k_lookback = self.params.rsi_length + (self.params.length - 1) + (self.params.k - 1);
        match self.band {
            StochRsiBand::K => k_lookback,
            StochRsiBand::D => k_lookback + (self.params.d - 1),
        }
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let (k, d) = Self::compute_bands(self.params, series)?;
        Ok(match self.band {
            StochRsiBand::K => k,
            StochRsiBand::D => d,
        })
    }
}

/// Position of each value within its trailing `length`-bar range, 0..=100.
fn stochastic(series: &TimeSeries, length: usize) -> TimeSeries {
    let values = series.values();
    let mut result = vec![None; values.len()];

    for i in (length.saturating_sub(1))..values.len() {
        let window = &values[(i + 1 - length)..=i];
        let present: Option<Vec<f64>> = window.iter().copied().collect();
        let Some(window) = present else {
            continue;
        };
        let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = hi - lo;
        if range > 0.0 {
            result[i] = values[i].map(|v| 100.0 * (v - lo) / range);
        }
    }

    series.with_values(result)
}
