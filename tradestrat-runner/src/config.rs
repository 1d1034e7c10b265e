//! Scan configuration: serializable description of one multi-symbol scan.
//!
//! A `ScanConfig` fully determines a scan given the same input files. Its
//! `scan_id` is a BLAKE3 hash of the canonical JSON form, so two runs with
//! identical configs share an id.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradestrat_core::strategies::StrategyConfig;

/// Errors loading or validating a scan config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("config lists no symbols")]
    NoSymbols,

    #[error("invalid strategy parameters: {0}")]
    Strategy(#[from] tradestrat_core::SignalError),
}

/// Bar frequency the strategy runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    Daily,
    /// Daily input resampled to ISO weeks before scanning.
    Weekly,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Complete description of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub symbols: Vec<String>,
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Directory holding `{SYMBOL}.csv` or `{SYMBOL}.parquet`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Generate deterministic synthetic bars when a symbol has no file.
    #[serde(default)]
    pub allow_synthetic: bool,
    /// Where per-symbol CSVs and the summary go; no export when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Written as the trailing `[strategy]` table.
    pub strategy: StrategyConfig,
}

impl ScanConfig {
    /// Default-parameter config for a named strategy.
    pub fn preset(name: &str, symbols: Vec<String>) -> Result<Self, ConfigError> {
        let strategy = StrategyConfig::preset(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        Ok(Self {
            symbols,
            timeframe: Timeframe::default(),
            data_dir: default_data_dir(),
            allow_synthetic: false,
            output_dir: None,
            strategy,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it, for callers that layer
    /// more settings on before calling [`ScanConfig::validate`].
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Reject configs that could never produce a scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        self.strategy.build()?;
        Ok(())
    }

    /// Deterministic id: BLAKE3 of the serialized config.
    pub fn scan_id(&self) -> Result<String, ConfigError> {
        let json =
            serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
