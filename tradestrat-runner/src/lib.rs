//! tradestrat runner: scan orchestration on top of `tradestrat-core`.
//!
//! This crate provides:
//! - TOML scan configs with deterministic scan ids
//! - Data loading from CSV/Parquet with a synthetic fallback
//! - Parallel multi-symbol scans with per-symbol signal summaries
//! - Export of summaries and augmented tables

pub mod config;
pub mod data_loader;
pub mod export;
pub mod scan;

pub use config::{ConfigError, ScanConfig, Timeframe};
pub use data_loader::{load_table, LoadError, LoadOptions, LoadedTable};
pub use export::{save_artifacts, ScanSummary};
pub use scan::{run_scan, ScanError, ScanOutcome, SignalSummary, SymbolScan};
