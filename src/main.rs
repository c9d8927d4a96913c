//! simstats CLI
//!
//! Summarizes per-run simulator statistics into metric tables, a
//! spreadsheet, CSV files and bar charts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use simstats_summary::commands::{
    display_version, execute_summarize, inspect_file, print_config, SummarizeArgs,
};
use simstats_summary::utils::config::AnalysisConfig;

/// simstats - summarize cache prefetcher simulation results
#[derive(Parser, Debug)]
#[command(name = "simstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "SIMSTATS_CONFIG")]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load all stats files and export tables, summaries and charts
    Summarize {
        /// Root of the <config>/<suite>/<file>.stats tree
        #[arg(long)]
        stats_dir: Option<PathBuf>,

        /// Directory receiving the exports
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Configuration speedups are measured against
        #[arg(short, long)]
        baseline: Option<String>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,

        /// Do not print tables to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the flattened, padded paths of one stats file
    Inspect {
        /// Path to the stats file
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    // Execute command
    match cli.command {
        Commands::Summarize {
            stats_dir,
            out_dir,
            baseline,
            no_charts,
            quiet,
        } => {
            let args = SummarizeArgs {
                stats_dir,
                out_dir,
                baseline,
                no_charts,
                quiet,
            };
            execute_summarize(&args, &config)?;
        }

        Commands::Inspect { file } => {
            print!("{}", inspect_file(&file, &config)?);
        }

        Commands::Config => {
            print_config(&config)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
