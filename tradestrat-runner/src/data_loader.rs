//! Bar loading for the runner.
//!
//! Given a symbol, looks for `{data_dir}/{SYMBOL}.csv` then
//! `{data_dir}/{SYMBOL}.parquet` and converts the frame into a
//! [`PriceTable`]. When neither exists and synthetic data is allowed, a
//! deterministic random walk seeded from the symbol is generated instead.
//!
//! Synthetic data is a developer-only debug mode. Tables built from it are
//! tagged so summaries and exports can say so.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use tradestrat_core::data::{table_from_dataframe, FrameError};
use tradestrat_core::domain::{Bar, PriceTable};

/// Trading days generated per synthetic symbol (about three years).
pub const SYNTHETIC_BARS: usize = 756;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data file for '{symbol}' in {dir} (use --synthetic for synthetic data)")]
    NotFound { symbol: String, dir: PathBuf },

    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("bad bar data for '{symbol}': {source}")]
    Frame {
        symbol: String,
        #[source]
        source: FrameError,
    },
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub data_dir: PathBuf,
    /// If true, generate synthetic bars when no file exists.
    pub synthetic: bool,
}

/// A loaded table and its provenance.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: PriceTable,
    pub synthetic: bool,
}

/// File formats the loader understands, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Parquet,
}

impl SourceFormat {
    fn extension(self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Parquet => "parquet",
        }
    }
}

fn locate(dir: &Path, symbol: &str) -> Option<(PathBuf, SourceFormat)> {
    [SourceFormat::Csv, SourceFormat::Parquet]
        .into_iter()
        .map(|fmt| (dir.join(format!("{symbol}.{}", fmt.extension())), fmt))
        .find(|(path, _)| path.is_file())
}

fn read_frame(path: &Path, format: SourceFormat) -> Result<DataFrame, PolarsError> {
    match format {
        SourceFormat::Csv => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect(),
        SourceFormat::Parquet => {
            let file = std::fs::File::open(path)?;
            ParquetReader::new(file).finish()
        }
    }
}

/// Load one symbol's bars, falling back to synthetic data when allowed.
pub fn load_table(symbol: &str, opts: &LoadOptions) -> Result<LoadedTable, LoadError> {
    if let Some((path, format)) = locate(&opts.data_dir, symbol) {
        debug!(symbol, path = %path.display(), "reading bars");
        let df = read_frame(&path, format).map_err(|e| LoadError::Read {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let table = table_from_dataframe(&df, symbol).map_err(|source| LoadError::Frame {
            symbol: symbol.to_string(),
            source,
        })?;
        return Ok(LoadedTable {
            table,
            synthetic: false,
        });
    }

    if opts.synthetic {
        warn!(symbol, "no data file, generating synthetic bars");
        let table = PriceTable::new(symbol, generate_synthetic_bars(symbol, SYNTHETIC_BARS))
            .map_err(|e| LoadError::Frame {
                symbol: symbol.to_string(),
                source: e.into(),
            })?;
        return Ok(LoadedTable {
            table,
            synthetic: true,
        });
    }

    Err(LoadError::NotFound {
        symbol: symbol.to_string(),
        dir: opts.data_dir.clone(),
    })
}

/// Generate `count` weekday bars of a random walk starting at 100.0.
///
/// The RNG is seeded from the BLAKE3 hash of the symbol, so the same symbol
/// always yields the same bars.
pub fn generate_synthetic_bars(symbol: &str, count: usize) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let Some(mut current) = NaiveDate::from_ymd_opt(2020, 1, 2) else {
        return bars;
    };

    while bars.len() < count {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        bars.push(Bar {
            date: current,
            open,
            high: open.max(close) * (1.0 + rng.gen_range(0.0..0.01)),
            low: open.min(close) * (1.0 - rng.gen_range(0.0..0.01)),
            close,
            volume: rng.gen_range(500_000.0..5_000_000.0),
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
