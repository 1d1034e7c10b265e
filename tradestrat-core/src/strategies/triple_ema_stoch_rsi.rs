//! Triple EMA + stochastic RSI momentum scan.
//!
//! Long when the slow, medium and fast EMAs all rise on the bar %K crosses
//! above %D; short when all three fall on the bar %K crosses below %D.
//! RSI, stochastic-band and close-above-EMA columns are informational.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{require_history, ScanReport, Strategy};
use crate::composer::compose_momentum;
use crate::detectors::{crossover, gradient_sign, strictly_above, threshold};
use crate::domain::PriceTable;
use crate::error::{require_finite, require_period, Result, SignalError};
use crate::indicators::{Ema, Indicator, Rsi, StochRsi, StochRsiParams};

pub const NAME: &str = "triple_ema_stoch_rsi";

pub const SRSI_K: &str = "srsik";
pub const SRSI_D: &str = "srsid";
pub const EMA_SLOW: &str = "EMA SLOW";
pub const EMA_MED: &str = "EMA MED";
pub const EMA_FAST: &str = "EMA FAST";
pub const RSI: &str = "RSI";
pub const EMA_GRAD: &str = "EMA GRAD";
pub const CLOSE_ABOVE_EMA: &str = "Close > EMA";
pub const RSI_THRESHOLD: &str = "RSI threshold";
pub const STOCH_K_THRESHOLD: &str = "Stoch RSI K threshold";
pub const CROSSOVER: &str = "Crossover";
pub const SIGNAL: &str = "Signal";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripleEmaStochRsiParams {
    pub stoch: StochRsiParams,
    pub ema_slow: usize,
    pub ema_med: usize,
    pub ema_fast: usize,
    pub rsi_length: usize,
    /// Single pivot splitting RSI into above (+1) and below (-1).
    pub rsi_pivot: f64,
    pub stoch_rsi_upper: f64,
    pub stoch_rsi_lower: f64,
}

impl Default for TripleEmaStochRsiParams {
    fn default() -> Self {
        Self {
            stoch: StochRsiParams::default(),
            ema_slow: 200,
            ema_med: 50,
            ema_fast: 21,
            rsi_length: 14,
            rsi_pivot: 50.0,
            stoch_rsi_upper: 80.0,
            stoch_rsi_lower: 20.0,
        }
    }
}

impl TripleEmaStochRsiParams {
    pub fn validate(&self) -> Result<()> {
        self.stoch.validate()?;
        require_period("ema_slow", self.ema_slow)?;
        require_period("ema_med", self.ema_med)?;
        require_period("ema_fast", self.ema_fast)?;
        require_period("rsi_length", self.rsi_length)?;
        require_finite("rsi_pivot", self.rsi_pivot)?;
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

pub struct TripleEmaStochRsi {
    params: TripleEmaStochRsiParams,
    emas: [Ema; 3],
    rsi: Rsi,
    stoch_d: StochRsi,
}

impl TripleEmaStochRsi {
    pub fn new(params: TripleEmaStochRsiParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            emas: [
                Ema::new(params.ema_slow)?,
                Ema::new(params.ema_med)?,
                Ema::new(params.ema_fast)?,
            ],
            rsi: Rsi::new(params.rsi_length)?,
            stoch_d: StochRsi::d(params.stoch)?,
        })
    }

    pub fn params(&self) -> &TripleEmaStochRsiParams {
        &self.params
    }
}

impl Strategy for TripleEmaStochRsi {
    fn name(&self) -> &str {
        NAME
    }

    fn warmup_bars(&self) -> usize {
        let ema = self.emas.iter().map(Indicator::lookback).max().unwrap_or(0);
        // gradient and K/D crossover each need the previous bar
        ema.max(self.stoch_d.lookback()) + 1
    }

    fn scan(&self, table: &PriceTable) -> Result<ScanReport> {
        require_history(self, table)?;
        let p = &self.params;
        let close = table.close();

        let (k, d) = StochRsi::compute_bands(p.stoch, &close)?;
        let [slow, med, fast] = &self.emas;
        let ema_slow = slow.compute(&close)?;
        let ema_med = med.compute(&close)?;
        let ema_fast = fast.compute(&close)?;
        let rsi = self.rsi.compute(&close)?;

        let grad = gradient_sign(&[&ema_slow, &ema_med, &ema_fast])?;
        let close_above = strictly_above(&close, &ema_fast)?;
        let rsi_zone = threshold(&rsi, p.rsi_pivot, p.rsi_pivot)?;
        let k_zone = threshold(&k, p.stoch_rsi_upper, p.stoch_rsi_lower)?;
        let cross = crossover(&k, &d)?;
        let signal = compose_momentum(&grad, &cross)?;

        debug!(
            symbol = table.symbol(),
            bars = table.len(),
            crossings = cross.iter().flatten().filter(|c| *c != 0).count(),
            "triple_ema_stoch_rsi scan"
        );

        let mut report = ScanReport::new(NAME, table.symbol(), table.index());
        report.push(SRSI_K, k)?;
        report.push(SRSI_D, d)?;
        report.push(EMA_SLOW, ema_slow)?;
        report.push(EMA_MED, ema_med)?;
        report.push(EMA_FAST, ema_fast)?;
        report.push(RSI, rsi)?;
        report.push(EMA_GRAD, grad)?;
        report.push(CLOSE_ABOVE_EMA, close_above)?;
        report.push(RSI_THRESHOLD, rsi_zone)?;
        report.push(STOCH_K_THRESHOLD, k_zone)?;
        report.push(CROSSOVER, cross)?;
        report.push(SIGNAL, signal)?;
        Ok(report)
    }
}
