//! Double RSI reversal scan.
//!
//! A fast RSI crossing back out of an extreme zone is the trigger. Its local
//! extrema inside the zones mark reversal points; the slow RSI read at those
//! points feeds the trend tracker, which gates the trigger:
//! - long: fast RSI crosses up through the low band and the slow RSI made a
//!   higher low between the last two qualified fast-RSI minima
//! - short: fast RSI crosses down through the high band and the slow RSI did
//!   not make a higher high between the last two qualified maxima

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{require_history, ScanReport, Strategy};
use crate::composer::compose_reversal;
use crate::detectors::{crossover_fixed, threshold};
use crate::domain::PriceTable;
use crate::error::{require_finite, require_period, Result, SignalError};
use crate::indicators::{ExtremaLocator, Indicator, LocalExtrema, Rsi};
use crate::trend::{ExtremaFilter, ExtremumKind, TrendTracker};

pub const NAME: &str = "double_rsi";

pub const RSI_SLOW: &str = "RSI Slow";
pub const RSI_FAST: &str = "RSI Fast";
pub const RSI_THRESHOLD: &str = "RSI Threshold";
pub const RSI_LOW_LIMIT: &str = "RSI Low Limit";
pub const RSI_HIGH_LIMIT: &str = "RSI High Limit";
pub const RSI_FAST_SIGNAL: &str = "RSI Fast Signal";
pub const LOCAL_MAX: &str = "Local Max";
pub const LOCAL_MIN: &str = "Local Min";
pub const RSI_TREND_MAX: &str = "RSI Trend Max";
pub const RSI_TREND_MIN: &str = "RSI Trend Min";
pub const HIGHER_HIGH: &str = "Higher High";
pub const HIGHER_LOW: &str = "Higher Low";
pub const SIGNAL: &str = "Signal";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleRsiParams {
    pub fast_rsi_length: usize,
    pub slow_rsi_length: usize,
    /// Long trigger band; minima qualify at or below it.
    pub rsi_threshold_low: f64,
    /// Short trigger band; maxima qualify at or above it.
    pub rsi_threshold_high: f64,
    /// Radius of the local-extrema window on the fast RSI.
    pub local_window: usize,
}

impl Default for DoubleRsiParams {
    fn default() -> Self {
        Self {
            fast_rsi_length: 2,
            slow_rsi_length: 14,
            rsi_threshold_low: 15.0,
            rsi_threshold_high: 85.0,
            local_window: 5,
        }
    }
}

impl DoubleRsiParams {
    pub fn validate(&self) -> Result<()> {
        require_period("fast_rsi_length", self.fast_rsi_length)?;
        require_period("slow_rsi_length", self.slow_rsi_length)?;
        require_period("local_window", self.local_window)?;
        require_finite("rsi_threshold_low", self.rsi_threshold_low)?;
        require_finite("rsi_threshold_high", self.rsi_threshold_high)?;
        if self.rsi_threshold_low >= self.rsi_threshold_high {
            return Err(SignalError::invalid(
                "rsi_threshold_low",
                format!(
                    "low band {} must be below high band {}",
                    self.rsi_threshold_low, self.rsi_threshold_high
                ),
            ));
        }
        Ok(())
    }
}

pub struct DoubleRsi {
    params: DoubleRsiParams,
    fast: Rsi,
    slow: Rsi,
    filter: ExtremaFilter,
    locator: Box<dyn ExtremaLocator>,
}

impl DoubleRsi {
    pub fn new(params: DoubleRsiParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            fast: Rsi::new(params.fast_rsi_length)?,
            slow: Rsi::new(params.slow_rsi_length)?,
            filter: ExtremaFilter::new(params.rsi_threshold_high, params.rsi_threshold_low)?,
            locator: Box::new(LocalExtrema::new(params.local_window)?),
        })
    }

    /// Swap the local-extrema locator used on the fast RSI.
    pub fn with_locator(mut self, locator: Box<dyn ExtremaLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn params(&self) -> &DoubleRsiParams {
        &self.params
    }
}

impl Strategy for DoubleRsi {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        // one extra bar for the fast RSI band crossing
        self.fast.lookback().max(self.slow.lookback()) + 1
    }

    fn scan(&self, table: &PriceTable) -> Result<ScanReport> {
        require_history(self, table)?;
        let p = &self.params;
        let close = table.close();

        let rsi_slow = self.slow.compute(&close)?;
        let rsi_fast = self.fast.compute(&close)?;

        let zone = threshold(&rsi_fast, p.rsi_threshold_high, p.rsi_threshold_low)?;
        let prev_fast = rsi_fast.shift();
        let low_limit = prev_fast.map(|v| v < p.rsi_threshold_low);
        let high_limit = prev_fast.map(|v| v > p.rsi_threshold_high);
        let fast_signal =
            crossover_fixed(&rsi_fast, p.rsi_threshold_low, p.rsi_threshold_high)?;

        let candidates = self.locator.locate(&rsi_fast);
        let qualified = self.filter.apply(&candidates, &rsi_fast)?;
        let on_slow = qualified.project_onto(&rsi_slow)?;
        let trend = TrendTracker::scan(&on_slow)?;
        let signal = compose_reversal(&fast_signal, &trend)?;

        debug!(
            symbol = table.symbol(),
            bars = table.len(),
            candidates = candidates.len(),
            qualified_max = qualified.count(ExtremumKind::Max),
            qualified_min = qualified.count(ExtremumKind::Min),
            "double_rsi scan"
        );

        let mut report = ScanReport::new(NAME, table.symbol(), table.index());
        report.push(RSI_SLOW, rsi_slow)?;
        report.push(RSI_FAST, rsi_fast)?;
        report.push(RSI_THRESHOLD, zone)?;
        report.push(RSI_LOW_LIMIT, low_limit)?;
        report.push(RSI_HIGH_LIMIT, high_limit)?;
        report.push(RSI_FAST_SIGNAL, fast_signal)?;
        report.push(LOCAL_MAX, qualified.highs)?;
        report.push(LOCAL_MIN, qualified.lows)?;
        report.push(RSI_TREND_MAX, on_slow.highs)?;
        report.push(RSI_TREND_MIN, on_slow.lows)?;
        report.push(HIGHER_HIGH, trend.higher_high)?;
        report.push(HIGHER_LOW, trend.higher_low)?;
        report.push(SIGNAL, signal)?;
        Ok(report)
    }
}
