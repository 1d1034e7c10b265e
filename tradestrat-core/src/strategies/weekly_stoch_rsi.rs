//! Weekly stochastic RSI scan.
//!
//! Informational columns only: single EMA slope, close-above-EMA, %K zone
//! and %K/%D crossover. Meant to be run on weekly-resampled tables; it
//! produces no composed signal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{require_history, ScanReport, Strategy};
use crate::detectors::{crossover, first_difference, strictly_above, threshold};
use crate::domain::PriceTable;
use crate::error::{require_finite, require_period, Result, SignalError};
use crate::indicators::{Ema, Indicator, Rsi, StochRsi, StochRsiParams};

pub const NAME: &str = "weekly_stoch_rsi";

pub const SRSI_K: &str = "srsik";
pub const SRSI_D: &str = "srsid";
pub const EMA: &str = "EMA";
pub const RSI: &str = "RSI";
pub const EMA_GRAD: &str = "EMA GRAD";
pub const CLOSE_ABOVE_EMA: &str = "Close > EMA";
pub const STOCH_K_THRESHOLD: &str = "Stoch RSI K threshold";
pub const CROSSOVER: &str = "Crossover";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyStochRsiParams {
    pub stoch: StochRsiParams,
    pub ema_length: usize,
    pub rsi_length: usize,
    pub stoch_rsi_upper: f64,
    pub stoch_rsi_lower: f64,
}

impl Default for WeeklyStochRsiParams {
    fn default() -> Self {
        Self {
            stoch: StochRsiParams::default(),
            ema_length: 21,
            rsi_length: 14,
            stoch_rsi_upper: 80.0,
            stoch_rsi_lower: 20.0,
        }
    }
}

impl WeeklyStochRsiParams {
    pub fn validate(&self) -> Result<()> {
        self.stoch.validate()?;
        require_period("ema_length", self.ema_length)?;
        require_period("rsi_length", self.rsi_length)?;
        require_finite("stoch_rsi_upper", self.stoch_rsi_upper)?;
        require_finite("stoch_rsi_lower", self.stoch_rsi_lower)?;
        if self.stoch_rsi_upper < self.stoch_rsi_lower {
            return Err(SignalError::invalid(
                "stoch_rsi_upper",
                format!(
                    "upper bound {} is below lower bound {}",
                    self.stoch_rsi_upper, self.stoch_rsi_lower
                ),
            ));
        }
        Ok(())
    }
}

pub struct WeeklyStochRsi {
    params: WeeklyStochRsiParams,
    ema: Ema,
    rsi: Rsi,
    stoch_d: StochRsi,
}

impl WeeklyStochRsi {
    pub fn new(params: WeeklyStochRsiParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ema: Ema::new(params.ema_length)?,
            rsi: Rsi::new(params.rsi_length)?,
            stoch_d: StochRsi::d(params.stoch)?,
        })
    }

    pub fn params(&self) -> &WeeklyStochRsiParams {
        &self.params
    }
}

impl Strategy for WeeklyStochRsi {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        self.ema.lookback().max(self.stoch_d.lookback()) + 1
    }

    fn scan(&self, table: &PriceTable) -> Result<ScanReport> {
        require_history(self, table)?;
        let p = &self.params;
        let close = table.close();

        let (k, d) = StochRsi::compute_bands(p.stoch, &close)?;
        let ema = self.ema.compute(&close)?;
        let rsi = self.rsi.compute(&close)?;
        let slope = first_difference(&ema);
        let close_above = strictly_above(&close, &ema)?;
        let k_zone = threshold(&k, p.stoch_rsi_upper, p.stoch_rsi_lower)?;
        let cross = crossover(&k, &d)?;

        debug!(symbol = table.symbol(), bars = table.len(), "weekly_stoch_rsi scan");

        let mut report = ScanReport::new(NAME, table.symbol(), table.index());
        report.push(SRSI_K, k)?;
        report.push(SRSI_D, d)?;
        report.push(EMA, ema)?;
        report.push(RSI, rsi)?;
        report.push(EMA_GRAD, slope)?;
        report.push(CLOSE_ABOVE_EMA, close_above)?;
        report.push(STOCH_K_THRESHOLD, k_zone)?;
        report.push(CROSSOVER, cross)?;
        Ok(report)
    }
}
