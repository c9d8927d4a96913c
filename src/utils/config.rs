//! Configuration and constants for the CLI.
//!
//! `AnalysisConfig` is read from an optional TOML file; every section has
//! defaults matching the standard `eval/` layout, so an empty file (or no
//! file at all) is a valid configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current summary.json schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Text shown in place of a padding segment
pub const PAD_LABEL: &str = "-";

/// Names of the base table's row levels after relabeling
pub const ROW_LEVEL_NAMES: [&str; 3] = ["prefetch", "suite", "trace"];

// Output file names, relative to the summary directory
pub const WORKBOOK_FILE: &str = "stats-all.xlsx";
pub const CSV_DIR: &str = "csv";
pub const SUMMARY_JSON_FILE: &str = "summary.json";
pub const DETAILED_PLOT_FILE: &str = "plot.svg";
pub const AVERAGE_PLOT_FILE: &str = "plot.avg.svg";

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub metrics: MetricConfig,

    #[serde(default)]
    pub charts: ChartConfig,
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the `<config>/<suite>/<file>.stats` tree
    pub stats_dir: PathBuf,

    /// Directory receiving every export
    pub summary_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            stats_dir: PathBuf::from("./eval/stats/formatted/"),
            summary_dir: PathBuf::from("./eval/summary/"),
        }
    }
}

/// Stats file discovery and key filtering
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Joins nested JSON keys until a stop pattern matches
    pub separator: String,

    /// Only files with this extension are loaded
    pub extension: String,

    /// Joined keys whose value is kept intact
    pub stop: Vec<String>,

    /// Joined keys whose subtree is discarded
    pub drop: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            extension: "stats".to_string(),
            stop: to_strings(&[
                "roi-stats.{n_cpu}.L1I",
                "roi-stats.{n_cpu}.ipc-cumulative",
            ]),
            drop: to_strings(&[
                "warmup-instr",
                "sim-instr",
                "num-cpu",
                "llc-set",
                "llc-way",
                "dram",
                "trace",
                "finished",
                "roi-stats.{n_cpu}.instr",
                "roi-stats.{n_cpu}.cycle",
                "roi-stats.{n_cpu}.L1D",
                "roi-stats.{n_cpu}.L2C",
                "roi-stats.{n_cpu}.LLC",
                "dram-stats",
                "branch-prediction",
                "branch-type",
            ]),
        }
    }
}

/// Templates used to relabel row index levels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    pub config_template: String,
    pub config_field: String,
    pub trace_template: String,
    pub trace_field: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            config_template:
                "{branch}-{l1i_pref}-{l1d_pref}-{l2c_pref}-{llc_pref}-{llc_repl}-{n_core}core"
                    .to_string(),
            config_field: "l1i_pref".to_string(),
            trace_template: "{binary}.{trace}.{n_sim}.{n_warm}.stats".to_string(),
            trace_field: "trace".to_string(),
        }
    }
}

/// Column selection for metric derivation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Configuration every speedup is measured against
    pub baseline: String,

    /// Top-level column holding cumulative IPC
    pub ipc_key: String,

    /// Top-level column holding the cache's load/prefetch counters
    pub cache_key: String,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            baseline: "NOPREF".to_string(),
            ipc_key: "roi-stats.cpu0.ipc-cumulative".to_string(),
            cache_key: "roi-stats.cpu0.L1I".to_string(),
        }
    }
}

/// Chart layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub detailed_width: usize,
    pub panel_height: usize,
    pub avg_panel_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed_width: 1500,
            panel_height: 300,
            avg_panel_width: 250,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            [metrics]
            baseline = "baseline"
            "#,
        )
        .unwrap();

        assert_eq!(config.metrics.baseline, "baseline");
        assert_eq!(config.metrics.ipc_key, "roi-stats.cpu0.ipc-cumulative");
        assert_eq!(config.loader.separator, ".");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AnalysisConfig::default();
        let text = config.to_toml().unwrap();
        let back: AnalysisConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(AnalysisConfig::load("/nonexistent/simstats.toml").is_err());
    }
}
