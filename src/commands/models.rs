use crate::utils::config::AnalysisConfig;
use std::path::PathBuf;

/// Arguments for the summarize command
///
/// **Public** - used by main.rs to construct from CLI args. Every `Some`
/// field overrides the matching configuration value.
#[derive(Debug, Clone, Default)]
pub struct SummarizeArgs {
    /// Root of the stats tree
    pub stats_dir: Option<PathBuf>,

    /// Directory receiving every export
    pub out_dir: Option<PathBuf>,

    /// Configuration speedups are measured against
    pub baseline: Option<String>,

    /// Skip chart rendering
    pub no_charts: bool,

    /// Do not print tables to stdout
    pub quiet: bool,
}

impl SummarizeArgs {
    /// Effective configuration: `config` with the CLI overrides applied
    pub fn apply(&self, config: &AnalysisConfig) -> AnalysisConfig {
        let mut config = config.clone();

        if let Some(dir) = &self.stats_dir {
            config.paths.stats_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.paths.summary_dir = dir.clone();
        }
        if let Some(baseline) = &self.baseline {
            config.metrics.baseline = baseline.clone();
        }
        if self.no_charts {
            config.charts.enabled = false;
        }

        config
    }
}
