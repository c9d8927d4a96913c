//! Machine-readable run summary.

use crate::aggregator::{MetricSet, SummaryVector};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use serde::Serialize;

/// Contents of `summary.json`
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// Schema version
    pub version: String,

    /// RFC 3339 timestamp of the run
    pub generated_at: String,

    /// Configuration speedups are measured against
    pub baseline: String,

    /// Every trace present in the IPC table
    pub traces: Vec<String>,

    /// Every configuration present in the IPC table
    pub configs: Vec<String>,

    pub summaries: Vec<SummaryVector>,
}

impl SummaryReport {
    pub fn new(baseline: &str, metrics: &MetricSet, summaries: Vec<SummaryVector>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            baseline: baseline.to_string(),
            traces: metrics.ipc.traces().map(str::to_string).collect(),
            configs: metrics.ipc.configs().map(str::to_string).collect(),
            summaries,
        }
    }
}

/// Serialize a report with pretty printing
///
/// Missing summary values serialize as `null`.
pub fn summary_json(report: &SummaryReport) -> Result<String, OutputError> {
    let mut text = serde_json::to_string_pretty(report)?;
    text.push('\n');
    Ok(text)
}
