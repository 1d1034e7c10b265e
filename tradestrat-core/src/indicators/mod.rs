//! Moving averages, oscillators and local-extrema location.
//!
//! Moving averages are engine primitives. RSI, stochastic RSI and the
//! local-extrema locator are reference implementations of collaborators the
//! engine only sees through the [`Indicator`] and [`ExtremaLocator`] traits,
//! so callers may plug in their own library.
//!
//! Multi-series indicators (stochastic RSI) are exposed as separate named
//! instances per band, keeping the single-series `Indicator` trait unchanged.

pub mod ema;
pub mod extrema;
pub mod rsi;
pub mod sma;
pub mod stoch_rsi;

pub use ema::{exponential_moving_average, Ema};
pub use extrema::{ExtremaLocator, LocalExtrema};
pub use rsi::Rsi;
pub use sma::{simple_moving_average, Sma};
pub use stoch_rsi::{StochRsi, StochRsiBand, StochRsiParams};

use crate::error::Result;
use crate::series::TimeSeries;

/// Trait for single-series indicators.
///
/// Indicators take a full input series and produce an output series on the
/// same index. The first `lookback()` values are missing (warm-up).
///
/// # Look-ahead contamination guard
/// No output value at bar t may depend on input from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars reported as missing.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series.
    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
