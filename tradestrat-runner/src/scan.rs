//! Multi-symbol scan orchestration.
//!
//! Each symbol is loaded, optionally resampled to weekly bars, and scanned
//! independently; symbols run in parallel on the rayon pool. Any failing
//! symbol fails the whole scan.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use tradestrat_core::data::resample_weekly;
use tradestrat_core::domain::{PriceTable, Signal};
use tradestrat_core::strategies::{ScanReport, Strategy};
use tradestrat_core::SignalError;

use crate::config::{ConfigError, ScanConfig, Timeframe};
use crate::data_loader::{load_table, LoadError, LoadOptions};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("scan failed for '{symbol}': {source}")]
    Signal {
        symbol: String,
        #[source]
        source: SignalError,
    },
}

/// Per-symbol digest of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub symbol: String,
    pub bars: usize,
    pub longs: usize,
    pub shorts: usize,
    /// Date and direction (+1/-1) of the most recent non-flat signal.
    pub last_signal: Option<(NaiveDate, i8)>,
    pub synthetic: bool,
}

impl SignalSummary {
    fn from_report(table: &PriceTable, report: &ScanReport, synthetic: bool) -> Self {
        let mut summary = Self {
            symbol: table.symbol().to_string(),
            bars: table.len(),
            longs: 0,
            shorts: 0,
            last_signal: None,
            synthetic,
        };
        let Some(signal) = report.signal() else {
            return summary;
        };
        for (bar, value) in table.bars().iter().zip(signal.iter()) {
            match value {
                Some(Signal::Long) => summary.longs += 1,
                Some(Signal::Short) => summary.shorts += 1,
                _ => continue,
            }
            summary.last_signal = value.map(|s| (bar.date, s.as_i8()));
        }
        summary
    }
}

/// Scan output for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolScan {
    /// The table the strategy ran on (weekly when resampled).
    pub table: PriceTable,
    pub report: ScanReport,
    pub summary: SignalSummary,
}

/// Complete result of a multi-symbol scan, in config symbol order.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub scan_id: String,
    pub strategy: String,
    pub timeframe: Timeframe,
    pub symbols: Vec<SymbolScan>,
}

impl ScanOutcome {
    pub fn summaries(&self) -> Vec<&SignalSummary> {
        self.symbols.iter().map(|s| &s.summary).collect()
    }

    pub fn has_synthetic(&self) -> bool {
        self.symbols.iter().any(|s| s.summary.synthetic)
    }
}

fn scan_symbol(
    symbol: &str,
    strategy: &dyn Strategy,
    timeframe: Timeframe,
    opts: &LoadOptions,
) -> Result<SymbolScan, ScanError> {
    let loaded = load_table(symbol, opts)?;
    let signal_err = |source| ScanError::Signal {
        symbol: symbol.to_string(),
        source,
    };
    let table = match timeframe {
        Timeframe::Daily => loaded.table,
        Timeframe::Weekly => resample_weekly(&loaded.table).map_err(signal_err)?,
    };
    let report = strategy.scan(&table).map_err(signal_err)?;
    let summary = SignalSummary::from_report(&table, &report, loaded.synthetic);
    debug!(
        symbol,
        bars = summary.bars,
        longs = summary.longs,
        shorts = summary.shorts,
        "symbol scanned"
    );
    Ok(SymbolScan {
        table,
        report,
        summary,
    })
}

/// Run the configured strategy over every symbol.
pub fn run_scan(config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    config.validate()?;
    let scan_id = config.scan_id()?;
    let strategy = config
        .strategy
        .build()
        .map_err(|e| ScanError::Config(e.into()))?;
    let opts = LoadOptions {
        data_dir: config.data_dir.clone(),
        synthetic: config.allow_synthetic,
    };

    info!(
        scan_id = %&scan_id[..12],
        strategy = strategy.name(),
        symbols = config.symbols.len(),
        timeframe = ?config.timeframe,
        "starting scan"
    );

    let symbols = config
        .symbols
        .par_iter()
        .map(|symbol| scan_symbol(symbol, strategy.as_ref(), config.timeframe, &opts))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = ScanOutcome {
        scan_id,
        strategy: strategy.name().to_string(),
        timeframe: config.timeframe,
        symbols,
    };
    info!(
        longs = outcome.symbols.iter().map(|s| s.summary.longs).sum::<usize>(),
        shorts = outcome.symbols.iter().map(|s| s.summary.shorts).sum::<usize>(),
        synthetic = outcome.has_synthetic(),
        "scan complete"
    );
    Ok(outcome)
}
