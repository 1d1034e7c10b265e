//! tradestrat CLI: scan and preset commands.
//!
//! Commands:
//! - `scan`: run a strategy over one or more symbols from a TOML config
//!   file or a named preset, print per-symbol signal summaries, and
//!   optionally export artifacts
//! - `presets`: print the default scan config for each strategy as TOML

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradestrat_core::strategies::StrategyConfig;
use tradestrat_runner::{run_scan, save_artifacts, ScanConfig, ScanOutcome, Timeframe};

#[derive(Parser)]
#[command(
    name = "tradestrat",
    about = "tradestrat CLI: rule-based trade signal scans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scan from a TOML config file or named preset.
    Scan {
        /// Path to a TOML scan config.
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Named preset: double_rsi, triple_ema_stoch_rsi, weekly_stoch_rsi.
        #[arg(long)]
        preset: Option<String>,

        /// Symbol to scan; repeat for several (required with --preset).
        #[arg(long = "symbol")]
        symbols: Vec<String>,

        /// Directory holding {SYMBOL}.csv or {SYMBOL}.parquet.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use synthetic data for symbols without a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Resample daily bars to ISO weeks before scanning.
        #[arg(long, default_value_t = false)]
        weekly: bool,

        /// Output directory for exported artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print default scan configs as TOML.
    Presets {
        /// Only print this preset.
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            preset,
            symbols,
            data_dir,
            synthetic,
            weekly,
            output_dir,
        } => {
            let overrides = Overrides {
                symbols,
                data_dir,
                synthetic,
                weekly,
                output_dir,
            };
            run_scan_cmd(config, preset, overrides)
        }
        Commands::Presets { name } => run_presets(name.as_deref()),
    }
}

/// Command-line values layered over the loaded config.
struct Overrides {
    symbols: Vec<String>,
    data_dir: Option<PathBuf>,
    synthetic: bool,
    weekly: bool,
    output_dir: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut ScanConfig) {
        if !self.symbols.is_empty() {
            config.symbols = self.symbols;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if self.synthetic {
            config.allow_synthetic = true;
        }
        if self.weekly {
            config.timeframe = Timeframe::Weekly;
        }
        if self.output_dir.is_some() {
            config.output_dir = self.output_dir;
        }
    }
}

fn build_config(
    config_path: Option<PathBuf>,
    preset_name: Option<String>,
    overrides: Overrides,
) -> Result<ScanConfig> {
    let mut config = match (config_path, preset_name) {
        (Some(path), None) => ScanConfig::read(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        (None, Some(name)) => {
            if overrides.symbols.is_empty() {
                bail!("--preset needs at least one --symbol");
            }
            ScanConfig::preset(&name, Vec::new()).with_context(|| {
                format!("valid presets: {}", preset_names().join(", "))
            })?
        }
        _ => bail!("one of --config or --preset is required"),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run_scan_cmd(
    config_path: Option<PathBuf>,
    preset_name: Option<String>,
    overrides: Overrides,
) -> Result<()> {
    let config = build_config(config_path, preset_name, overrides)?;
    let outcome = run_scan(&config)?;

    print_summary(&outcome);

    if let Some(dir) = &config.output_dir {
        let scan_dir = save_artifacts(&outcome, dir)?;
        info!(dir = %scan_dir.display(), "artifacts saved");
        println!("Artifacts saved to: {}", scan_dir.display());
    }

    Ok(())
}

fn preset_names() -> Vec<&'static str> {
    StrategyConfig::presets().iter().map(|p| p.name()).collect()
}

fn run_presets(only: Option<&str>) -> Result<()> {
    let mut printed = 0;
    for name in preset_names() {
        if only.is_some_and(|o| o != name) {
            continue;
        }
        let config = ScanConfig::preset(name, vec!["SPY".to_string()])?;
        println!("# {name}");
        println!("{}", config.to_toml_string()?);
        printed += 1;
    }
    if printed == 0 {
        bail!(
            "unknown preset '{}'. Valid: {}",
            only.unwrap_or_default(),
            preset_names().join(", ")
        );
    }
    Ok(())
}

fn print_summary(outcome: &ScanOutcome) {
    println!();
    println!("=== Scan Result ===");
    println!("Strategy:  {}", outcome.strategy);
    println!("Timeframe: {:?}", outcome.timeframe);
    println!("Scan id:   {}", outcome.scan_id);
    println!();
    println!(
        "{:<10} {:>6} {:>6} {:>6}  {}",
        "Symbol", "Bars", "Longs", "Shorts", "Last signal"
    );
    for s in outcome.summaries() {
        let last = match s.last_signal {
            Some((date, 1)) => format!("LONG  {date}"),
            Some((date, _)) => format!("SHORT {date}"),
            None => "-".to_string(),
        };
        let marker = if s.synthetic { "*" } else { "" };
        println!(
            "{:<10} {:>6} {:>6} {:>6}  {}",
            format!("{}{marker}", s.symbol),
            s.bars,
            s.longs,
            s.shorts,
            last
        );
    }
    if outcome.has_synthetic() {
        println!();
        println!("WARNING: * marks symbols scanned on SYNTHETIC data");
    }
    println!();
}
