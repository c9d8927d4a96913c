//! Per-configuration summaries of metric tables.
//!
//! IPC is averaged harmonically, speedup geometrically, and miss rates
//! arithmetically. A missing cell makes a harmonic or geometric summary
//! missing; the arithmetic mean skips it. An empty column summarizes to
//! `None`.

use super::metrics::{MetricKind, MetricTable};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// How a metric column is reduced to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reduction {
    HarmonicMean,
    GeometricMean,
    ArithmeticMean,
}

impl Reduction {
    pub fn for_metric(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Ipc => Reduction::HarmonicMean,
            MetricKind::Speedup => Reduction::GeometricMean,
            MetricKind::MissRate | MetricKind::PrefetchMissRate => Reduction::ArithmeticMean,
        }
    }

    /// Whether one missing cell makes the whole summary missing
    pub fn propagates_missing(&self) -> bool {
        !matches!(self, Reduction::ArithmeticMean)
    }

    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Reduction::HarmonicMean => harmonic_mean(values),
            Reduction::GeometricMean => geometric_mean(values),
            Reduction::ArithmeticMean => arithmetic_mean(values),
        }
    }
}

/// One value per configuration of a metric table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryVector {
    pub metric: MetricKind,
    pub reduction: Reduction,
    pub values: BTreeMap<String, Option<f64>>,
}

impl SummaryVector {
    pub fn get(&self, config: &str) -> Option<f64> {
        self.values.get(config).copied().flatten()
    }
}

/// Reduce every configuration column of `table`
///
/// **Public** - main entry point for aggregation
pub fn summarize(table: &MetricTable) -> SummaryVector {
    let reduction = Reduction::for_metric(table.kind());
    let values = table
        .configs()
        .map(|config| (config.to_string(), reduce_column(table, config, reduction)))
        .collect();

    SummaryVector {
        metric: table.kind(),
        reduction,
        values,
    }
}

fn reduce_column(table: &MetricTable, config: &str, reduction: Reduction) -> Option<f64> {
    let cells = table.column(config);
    let present: Vec<f64> = cells.iter().flatten().copied().collect();
    let missing = cells.len() - present.len();

    if missing > 0 {
        if reduction.propagates_missing() {
            warn!(
                "{} / {}: {} of {} traces missing, summary left empty",
                table.kind().title(),
                config,
                missing,
                cells.len()
            );
            return None;
        }
        debug!(
            "{} / {}: averaging over {} of {} traces",
            table.kind().title(),
            config,
            present.len(),
            cells.len()
        );
    }

    reduction.apply(&present)
}

/// `n / sum(1/x)`; 0 if any value is 0, `None` for negatives or no values
pub fn harmonic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| *v < 0.0) {
        return None;
    }
    if values.iter().any(|v| *v == 0.0) {
        return Some(0.0);
    }
    let reciprocal_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    Some(values.len() as f64 / reciprocal_sum)
}

/// `exp(mean(ln x))`; `None` for non-positive values or no values
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| *v <= 0.0) {
        return None;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}

pub fn arithmetic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_value_means() {
        assert_relative_eq!(harmonic_mean(&[1.7]).unwrap(), 1.7);
        assert_relative_eq!(geometric_mean(&[1.7]).unwrap(), 1.7);
        assert_relative_eq!(arithmetic_mean(&[1.7]).unwrap(), 1.7);
    }

    #[test]
    fn test_harmonic_mean() {
        assert_relative_eq!(harmonic_mean(&[1.0, 2.0, 4.0]).unwrap(), 12.0 / 7.0);
        assert_eq!(harmonic_mean(&[1.0, 0.0]), Some(0.0));
        assert_eq!(harmonic_mean(&[]), None);
        assert_eq!(harmonic_mean(&[-1.0, 2.0]), None);
    }

    #[test]
    fn test_geometric_mean() {
        assert_relative_eq!(geometric_mean(&[2.0, 8.0]).unwrap(), 4.0, epsilon = 1e-12);
        assert_eq!(geometric_mean(&[2.0, 0.0]), None);
    }

    #[test]
    fn test_arithmetic_mean() {
        assert_relative_eq!(arithmetic_mean(&[0.1, 0.3]).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_summarize_uses_metric_reduction() {
        let mut table = MetricTable::new(MetricKind::Speedup);
        table.insert("t1", "FDIP", Some(2.0));
        table.insert("t2", "FDIP", Some(8.0));
        table.insert("t1", "EIP", None);

        let summary = summarize(&table);
        assert_eq!(summary.reduction, Reduction::GeometricMean);
        assert_relative_eq!(summary.get("FDIP").unwrap(), 4.0, epsilon = 1e-12);
        assert_eq!(summary.values.get("EIP"), Some(&None));
    }

    #[test]
    fn test_missing_cell_empties_harmonic_and_geometric_summaries() {
        let mut ipc = MetricTable::new(MetricKind::Ipc);
        ipc.insert("t1", "NOPREF", Some(1.0));
        ipc.insert("t2", "NOPREF", Some(1.0));
        ipc.insert("t1", "FDIP", Some(4.0));
        ipc.insert("t2", "FDIP", None);

        let summary = summarize(&ipc);
        assert_eq!(summary.get("FDIP"), None);
        assert_relative_eq!(summary.get("NOPREF").unwrap(), 1.0);

        let speedup = crate::aggregator::derive_speedup(&ipc, "NOPREF").unwrap();
        assert_eq!(summarize(&speedup).get("FDIP"), None);
    }

    #[test]
    fn test_arithmetic_mean_skips_missing_cells() {
        let mut table = MetricTable::new(MetricKind::MissRate);
        table.insert("t1", "FDIP", Some(0.2));
        table.insert("t2", "FDIP", None);
        table.insert("t3", "FDIP", Some(0.4));

        let summary = summarize(&table);
        assert_relative_eq!(summary.get("FDIP").unwrap(), 0.3, epsilon = 1e-12);
    }
}
