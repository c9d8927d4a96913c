//! Summarize command implementation.
//!
//! The summarize command:
//! 1. Loads every stats file below the stats directory
//! 2. Reshapes the nested records into the base table
//! 3. Derives the metric tables
//! 4. Reduces every metric table to a summary vector
//! 5. Renders all exports in memory
//! 6. Writes the exports

use crate::aggregator::{derive_metrics, summarize, MetricSet, SummaryVector};
use crate::chart::{render_average, render_detailed, BarPanel};
use crate::commands::models::SummarizeArgs;
use crate::output::{
    metric_csv, render_metric_table, render_summary, render_workbook, summary_csv, summary_json,
    OutputBundle, SummaryReport,
};
use crate::parser::load_stats_dir;
use crate::table::{build_table, flatten, pad_paths, FlatTable, RowLabeler};
use crate::utils::config::{
    AnalysisConfig, AVERAGE_PLOT_FILE, CSV_DIR, DETAILED_PLOT_FILE, SUMMARY_JSON_FILE,
    WORKBOOK_FILE,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

const STEPS: usize = 6;

/// Everything computed from the stats tree, before any export
#[derive(Debug, Clone)]
pub struct Analysis {
    pub table: FlatTable,
    pub metrics: MetricSet,
    /// One summary per metric, in reporting order
    pub summaries: Vec<SummaryVector>,
}

/// Execute the summarize command
///
/// **Public** - main entry point called from main.rs
///
/// Nothing is written unless every step succeeds.
///
/// # Returns
/// Paths of the written files
pub fn execute_summarize(args: &SummarizeArgs, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();
    let config = args.apply(config);

    info!(
        "Summarizing {} into {}",
        config.paths.stats_dir.display(),
        config.paths.summary_dir.display()
    );

    let analysis = analyze(&config)?;

    info!("Step 5/{}: rendering outputs...", STEPS);
    let bundle = render_outputs(&analysis, &config)?;

    if !args.quiet {
        print_report(&analysis);
    }

    info!("Step 6/{}: writing {} files...", STEPS, bundle.len());
    let written = bundle
        .write_all()
        .context("Failed to write summary outputs")?;

    info!(
        "Summary completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(written)
}

/// Run steps 1 to 4 of the pipeline
pub fn analyze(config: &AnalysisConfig) -> Result<Analysis> {
    info!("Step 1/{}: loading stats files...", STEPS);
    let root = load_stats_dir(&config.paths.stats_dir, &config.loader).with_context(|| {
        format!(
            "Failed to load stats from {}",
            config.paths.stats_dir.display()
        )
    })?;

    info!("Step 2/{}: building base table...", STEPS);
    let flat = flatten(&root, &[]);
    debug!("Flattened {} leaves", flat.len());

    let padded = pad_paths(&flat);
    let labeler =
        RowLabeler::from_config(&config.labels).context("Invalid label template")?;
    let table = build_table(&padded, &labeler).context("Failed to build base table")?;
    debug!(
        "Base table: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );

    info!("Step 3/{}: deriving metrics...", STEPS);
    let metrics = derive_metrics(&table, &config.metrics).context("Failed to derive metrics")?;

    info!("Step 4/{}: aggregating...", STEPS);
    let summaries = metrics.tables().iter().map(|t| summarize(t)).collect();

    Ok(Analysis {
        table,
        metrics,
        summaries,
    })
}

/// Render every export into memory
///
/// Paths are relative to the configured summary directory.
pub fn render_outputs(analysis: &Analysis, config: &AnalysisConfig) -> Result<OutputBundle> {
    let out_dir = &config.paths.summary_dir;
    let csv_dir = out_dir.join(CSV_DIR);
    let mut bundle = OutputBundle::new();

    let workbook = render_workbook(&analysis.table).context("Failed to render workbook")?;
    bundle.add(out_dir.join(WORKBOOK_FILE), workbook);

    for table in analysis.metrics.tables() {
        let stem = table.kind().file_stem();
        let csv = metric_csv(table).with_context(|| format!("Failed to render {}.csv", stem))?;
        bundle.add(csv_dir.join(format!("{}.csv", stem)), csv);
    }
    for summary in &analysis.summaries {
        let stem = summary.metric.file_stem();
        let csv =
            summary_csv(summary).with_context(|| format!("Failed to render {}.avg.csv", stem))?;
        bundle.add(csv_dir.join(format!("{}.avg.csv", stem)), csv);
    }

    let report = SummaryReport::new(
        &config.metrics.baseline,
        &analysis.metrics,
        analysis.summaries.clone(),
    );
    let json = summary_json(&report).context("Failed to serialize summary")?;
    bundle.add(out_dir.join(SUMMARY_JSON_FILE), json);

    if config.charts.enabled {
        let detailed: Vec<BarPanel> = analysis
            .metrics
            .tables()
            .iter()
            .map(|t| BarPanel::detailed(t))
            .collect();
        let average: Vec<BarPanel> = analysis.summaries.iter().map(BarPanel::average).collect();

        let svg = render_detailed(&detailed, &config.charts)
            .context("Failed to render detailed chart")?;
        bundle.add(out_dir.join(DETAILED_PLOT_FILE), svg);

        let svg = render_average(&average, &config.charts)
            .context("Failed to render average chart")?;
        bundle.add(out_dir.join(AVERAGE_PLOT_FILE), svg);
    } else {
        debug!("Charts disabled");
    }

    Ok(bundle)
}

/// Print every metric table followed by its summary
///
/// **Private** - internal helper for execute_summarize
fn print_report(analysis: &Analysis) {
    for (table, summary) in analysis.metrics.tables().iter().zip(&analysis.summaries) {
        print!("{}", render_metric_table(table));
        print!("{}", render_summary(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_stats(root: &Path, config: &str, ipc: f64) {
        let dir = root.join(config).join("srv");
        fs::create_dir_all(&dir).unwrap();
        let body = format!(
            r#"{{
                "num-cpu": 1,
                "roi-stats": {{
                    "cpu0": {{
                        "ipc-cumulative": {ipc},
                        "instr": 1000,
                        "L1I": {{
                            "load": {{"access": 100, "miss": 10}},
                            "prefetch": {{"access": 50, "miss": 25}}
                        }}
                    }}
                }}
            }}"#
        );
        fs::write(dir.join("app.trace1.100.10.stats"), body).unwrap();
    }

    fn config_for(stats: &Path, out: &Path) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.paths.stats_dir = stats.to_path_buf();
        config.paths.summary_dir = out.to_path_buf();
        config
    }

    #[test]
    fn test_analyze_and_render() {
        let stats = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_stats(stats.path(), "BR-NOPREF-NOPREF-NOPREF-NOPREF-LRU-1core", 1.0);
        write_stats(stats.path(), "BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-1core", 2.0);

        let config = config_for(stats.path(), out.path());
        let analysis = analyze(&config).unwrap();

        assert_eq!(analysis.table.row_count(), 2);
        assert_eq!(analysis.metrics.speedup.get("trace1", "FDIP"), Some(2.0));
        assert_eq!(analysis.summaries.len(), 4);

        // 1 workbook + 8 csv + 1 json + 2 charts
        let bundle = render_outputs(&analysis, &config).unwrap();
        assert_eq!(bundle.len(), 12);

        let mut no_charts = config.clone();
        no_charts.charts.enabled = false;
        assert_eq!(render_outputs(&analysis, &no_charts).unwrap().len(), 10);
    }

    #[test]
    fn test_missing_stats_dir_fails() {
        let out = tempfile::tempdir().unwrap();
        let config = config_for(&out.path().join("absent"), out.path());
        assert!(analyze(&config).is_err());
    }
}
