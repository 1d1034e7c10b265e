//! Strategy scans: wire indicators, detectors, the trend tracker and the
//! composer into named report columns for one price table.
//!
//! Column names are part of the output contract and are listed as
//! constants in each strategy module.

pub mod double_rsi;
pub mod report;
pub mod triple_ema_stoch_rsi;
pub mod weekly_stoch_rsi;

pub use double_rsi::{DoubleRsi, DoubleRsiParams};
pub use report::{ColumnData, NamedColumn, ScanReport};
pub use triple_ema_stoch_rsi::{TripleEmaStochRsi, TripleEmaStochRsiParams};
pub use weekly_stoch_rsi::{WeeklyStochRsi, WeeklyStochRsiParams};

use serde::{Deserialize, Serialize};

use crate::domain::PriceTable;
use crate::error::{Result, SignalError};

/// A full-table scan producing report columns.
pub trait Strategy: Send + Sync {
    /// Identifier used in logs and exports (e.g., "double_rsi").
    fn name(&self) -> &str;

    /// Bars that must precede the first bar a signal can fire on.
    fn warmup_bars(&self) -> usize;

    fn scan(&self, table: &PriceTable) -> Result<ScanReport>;
}

/// Reject tables too short to get past the warm-up.
pub(crate) fn require_history(strategy: &dyn Strategy, table: &PriceTable) -> Result<()> {
    let required = strategy.warmup_bars() + 1;
    if table.len() < required {
        return Err(SignalError::InsufficientData {
            context: "strategy scan",
            required,
            available: table.len(),
        });
    }
    Ok(())
}

/// Declarative strategy selection, as found in scan config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    DoubleRsi(DoubleRsiParams),
    TripleEmaStochRsi(TripleEmaStochRsiParams),
    WeeklyStochRsi(WeeklyStochRsiParams),
}

impl StrategyConfig {
    /// Validate parameters and build the runtime strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>> {
        Ok(match self {
            StrategyConfig::DoubleRsi(p) => Box::new(DoubleRsi::new(*p)?),
            StrategyConfig::TripleEmaStochRsi(p) => Box::new(TripleEmaStochRsi::new(*p)?),
            StrategyConfig::WeeklyStochRsi(p) => Box::new(WeeklyStochRsi::new(*p)?),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::DoubleRsi(_) => double_rsi::NAME,
            StrategyConfig::TripleEmaStochRsi(_) => triple_ema_stoch_rsi::NAME,
            StrategyConfig::WeeklyStochRsi(_) => weekly_stoch_rsi::NAME,
        }
    }

    /// One default-parameter config per strategy.
    pub fn presets() -> Vec<StrategyConfig> {
        vec![
            StrategyConfig::DoubleRsi(DoubleRsiParams::default()),
            StrategyConfig::TripleEmaStochRsi(TripleEmaStochRsiParams::default()),
            StrategyConfig::WeeklyStochRsi(WeeklyStochRsiParams::default()),
        ]
    }

    pub fn preset(name: &str) -> Option<StrategyConfig> {
        Self::presets().into_iter().find(|c| c.name() == name)
    }
}
