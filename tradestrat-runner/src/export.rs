//! Scan export: JSON summary, per-symbol CSV and Parquet, Markdown digest.
//!
//! Artifacts for one scan land in `{output_dir}/{strategy}_{scan_id12}/`:
//! - `summary.json`: versioned [`ScanSummary`]
//! - `{SYMBOL}.csv`: bars plus every report column under its contract name
//! - `{SYMBOL}.parquet`: the same augmented table through polars
//! - `summary.md`: human-readable signal table
//!
//! The JSON summary carries a `schema_version`; newer versions are rejected
//! on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tradestrat_core::data::{augment, table_to_dataframe};

use crate::config::Timeframe;
use crate::scan::{ScanOutcome, SignalSummary, SymbolScan};

pub const SCHEMA_VERSION: u32 = 1;

/// Persisted digest of a whole scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub schema_version: u32,
    pub scan_id: String,
    pub strategy: String,
    pub timeframe: Timeframe,
    pub synthetic: bool,
    pub symbols: Vec<SignalSummary>,
}

impl ScanSummary {
    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scan_id: outcome.scan_id.clone(),
            strategy: outcome.strategy.clone(),
            timeframe: outcome.timeframe,
            synthetic: outcome.has_synthetic(),
            symbols: outcome.summaries().into_iter().cloned().collect(),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(summary: &ScanSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize ScanSummary to JSON")
}

/// Deserialize a `ScanSummary`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanSummary> {
    let summary: ScanSummary =
        serde_json::from_str(json).context("failed to deserialize ScanSummary from JSON")?;
    if summary.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            summary.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(summary)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// One row per bar: date, OHLCV, then each report column in order.
/// Missing cells are empty.
pub fn export_symbol_csv(scan: &SymbolScan) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["date", "open", "high", "low", "close", "volume"];
    header.extend(scan.report.column_names());
    wtr.write_record(&header)?;

    for (row, bar) in scan.table.bars().iter().enumerate() {
        let mut record = vec![
            bar.date.to_string(),
            fmt_price(bar.open),
            fmt_price(bar.high),
            fmt_price(bar.low),
            fmt_price(bar.close),
            fmt_price(bar.volume),
        ];
        record.extend(scan.report.columns().iter().map(|c| c.data.cell(row)));
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn fmt_price(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:.6}")
    }
}

// ─── Parquet ────────────────────────────────────────────────────────

fn write_symbol_parquet(scan: &SymbolScan, path: &Path) -> Result<()> {
    let frame = table_to_dataframe(&scan.table)?;
    let mut augmented = augment(frame, &scan.report)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(&mut augmented)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// ─── Markdown ───────────────────────────────────────────────────────

pub fn generate_report(summary: &ScanSummary) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Scan Report\n\n");
    md.push_str(&format!("- Strategy: `{}`\n", summary.strategy));
    md.push_str(&format!("- Timeframe: {:?}\n", summary.timeframe));
    md.push_str(&format!("- Scan id: `{}`\n", summary.scan_id));
    if summary.synthetic {
        md.push_str("- **Contains synthetic data**\n");
    }
    md.push('\n');

    md.push_str("| Symbol | Bars | Longs | Shorts | Last signal |\n");
    md.push_str("| --- | ---: | ---: | ---: | --- |\n");
    for s in &summary.symbols {
        let last = match s.last_signal {
            Some((date, 1)) => format!("LONG {date}"),
            Some((date, _)) => format!("SHORT {date}"),
            None => "-".to_string(),
        };
        let name = if s.synthetic {
            format!("{}*", s.symbol)
        } else {
            s.symbol.clone()
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            name, s.bars, s.longs, s.shorts, last
        ));
    }

    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Directory name for a scan: strategy plus the first 12 hex digits of its id.
pub fn scan_dir_name(outcome: &ScanOutcome) -> String {
    let short = outcome.scan_id.get(..12).unwrap_or(&outcome.scan_id);
    format!("{}_{}", outcome.strategy, short)
}

/// Save every artifact for a scan and return the created directory.
pub fn save_artifacts(outcome: &ScanOutcome, output_dir: &Path) -> Result<PathBuf> {
    let scan_dir = output_dir.join(scan_dir_name(outcome));
    std::fs::create_dir_all(&scan_dir)
        .with_context(|| format!("failed to create artifact dir: {}", scan_dir.display()))?;

    let summary = ScanSummary::from_outcome(outcome);
    std::fs::write(scan_dir.join("summary.json"), export_json(&summary)?)?;
    std::fs::write(scan_dir.join("summary.md"), generate_report(&summary))?;

    for scan in &outcome.symbols {
        let symbol = scan.table.symbol();
        std::fs::write(
            scan_dir.join(format!("{symbol}.csv")),
            export_symbol_csv(scan)?,
        )?;
        write_symbol_parquet(scan, &scan_dir.join(format!("{symbol}.parquet")))?;
    }

    Ok(scan_dir)
}

/// Load a `ScanSummary` from an artifact directory.
pub fn load_summary(dir: &Path) -> Result<ScanSummary> {
    let path = dir.join("summary.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
