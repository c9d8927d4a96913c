//! Derive per-metric tables from the base table.
//!
//! Each metric selects one or two columns of the base table, drops the
//! suite level, and pivots to traces x configurations:
//! - IPC: `(<ipc_key>, -, -)`
//! - Speedup: IPC divided by the baseline configuration's IPC
//! - Miss rate: `(<cache_key>, load, miss) / (<cache_key>, load, access)`
//! - Prefetch miss rate: same ratio under `prefetch`

use crate::parser::schema::Scalar;
use crate::table::{column_label, ColumnKey, FlatTable, Segment};
use crate::utils::config::MetricConfig;
use crate::utils::error::MetricError;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The four derived metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Ipc,
    Speedup,
    MissRate,
    PrefetchMissRate,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Ipc,
        MetricKind::Speedup,
        MetricKind::MissRate,
        MetricKind::PrefetchMissRate,
    ];

    /// Human-readable name used in console output and charts
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Ipc => "IPC",
            MetricKind::Speedup => "Speedup",
            MetricKind::MissRate => "Miss rate",
            MetricKind::PrefetchMissRate => "Prefetch miss rate",
        }
    }

    /// Base name of the metric's export files
    pub fn file_stem(&self) -> &'static str {
        match self {
            MetricKind::Ipc => "ipc",
            MetricKind::Speedup => "speedup",
            MetricKind::MissRate => "miss-rate",
            MetricKind::PrefetchMissRate => "prefetch-miss-rate",
        }
    }
}

/// Traces x configurations table of one metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    kind: MetricKind,
    traces: BTreeSet<String>,
    configs: BTreeSet<String>,
    values: BTreeMap<(String, String), f64>,
}

impl MetricTable {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            traces: BTreeSet::new(),
            configs: BTreeSet::new(),
            values: BTreeMap::new(),
        }
    }

    /// Register a cell; `None` records the row and column with a missing value
    pub fn insert(&mut self, trace: &str, config: &str, value: Option<f64>) {
        self.traces.insert(trace.to_string());
        self.configs.insert(config.to_string());
        if let Some(value) = value {
            self.values
                .insert((trace.to_string(), config.to_string()), value);
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn traces(&self) -> impl Iterator<Item = &str> {
        self.traces.iter().map(String::as_str)
    }

    pub fn configs(&self) -> impl Iterator<Item = &str> {
        self.configs.iter().map(String::as_str)
    }

    pub fn has_config(&self, config: &str) -> bool {
        self.configs.contains(config)
    }

    pub fn get(&self, trace: &str, config: &str) -> Option<f64> {
        self.values
            .get(&(trace.to_string(), config.to_string()))
            .copied()
    }

    /// One configuration column in trace order; `None` marks a missing cell
    pub fn column(&self, config: &str) -> Vec<Option<f64>> {
        self.traces().map(|trace| self.get(trace, config)).collect()
    }

    /// Copy of the table without `config`
    pub fn without_config(&self, config: &str) -> MetricTable {
        let mut out = self.clone();
        out.configs.remove(config);
        out.values.retain(|(_, c), _| c != config);
        out
    }
}

/// All derived metric tables of one run
#[derive(Debug, Clone)]
pub struct MetricSet {
    pub ipc: MetricTable,
    pub speedup: MetricTable,
    pub miss_rate: MetricTable,
    pub prefetch_miss_rate: MetricTable,
}

impl MetricSet {
    /// Tables in reporting order
    pub fn tables(&self) -> [&MetricTable; 4] {
        [
            &self.ipc,
            &self.speedup,
            &self.miss_rate,
            &self.prefetch_miss_rate,
        ]
    }
}

/// Derive every metric table
///
/// **Public** - main entry point for metric derivation
///
/// # Errors
/// * `MetricError::MissingColumn` - a selected column or the baseline is absent
/// * `MetricError::NonNumeric` - a selected cell holds non-numeric text
/// * `MetricError::DuplicateCell` - two rows share trace and configuration
/// * `MetricError::RowMismatch` - metrics cover different traces
pub fn derive_metrics(table: &FlatTable, config: &MetricConfig) -> Result<MetricSet, MetricError> {
    let ipc = derive_ipc(table, &config.ipc_key)?;
    let speedup = derive_speedup(&ipc, &config.baseline)?;
    let miss_rate = derive_miss_rate(table, &config.cache_key, "load", MetricKind::MissRate)?;
    let prefetch_miss_rate = derive_miss_rate(
        table,
        &config.cache_key,
        "prefetch",
        MetricKind::PrefetchMissRate,
    )?;

    let set = MetricSet {
        ipc,
        speedup,
        miss_rate,
        prefetch_miss_rate,
    };
    check_rows(&set)?;

    debug!(
        "Derived metrics for {} traces x {} configurations",
        set.ipc.traces.len(),
        set.ipc.configs.len()
    );

    Ok(set)
}

/// IPC per trace and configuration
pub fn derive_ipc(table: &FlatTable, ipc_key: &str) -> Result<MetricTable, MetricError> {
    let column: ColumnKey = [Segment::key(ipc_key), Segment::Pad, Segment::Pad];
    let cells = pivot(table, &column)?;

    let mut out = MetricTable::new(MetricKind::Ipc);
    for ((trace, config), value) in &cells {
        out.insert(trace, config, *value);
    }
    Ok(out)
}

/// Every column divided by the `baseline` column, baseline included
///
/// # Errors
/// * `MetricError::MissingColumn` - `baseline` is not a column of `ipc`
pub fn relative_to(ipc: &MetricTable, baseline: &str) -> Result<MetricTable, MetricError> {
    if !ipc.has_config(baseline) {
        return Err(MetricError::MissingColumn(format!(
            "'{}' (baseline)",
            baseline
        )));
    }

    let mut out = MetricTable::new(MetricKind::Speedup);
    for trace in ipc.traces() {
        let base = ipc.get(trace, baseline);
        for config in ipc.configs() {
            let value = match (ipc.get(trace, config), base) {
                (Some(v), Some(b)) if b != 0.0 => Some(v / b),
                _ => None,
            };
            out.insert(trace, config, value);
        }
    }
    Ok(out)
}

/// Speedup over `baseline`, with the baseline column removed
pub fn derive_speedup(ipc: &MetricTable, baseline: &str) -> Result<MetricTable, MetricError> {
    Ok(relative_to(ipc, baseline)?.without_config(baseline))
}

/// `miss / access` under `<cache_key>/<category>`
pub fn derive_miss_rate(
    table: &FlatTable,
    cache_key: &str,
    category: &str,
    kind: MetricKind,
) -> Result<MetricTable, MetricError> {
    let column = |counter: &str| -> ColumnKey {
        [
            Segment::key(cache_key),
            Segment::key(category),
            Segment::key(counter),
        ]
    };
    let misses = pivot(table, &column("miss"))?;
    let accesses = pivot(table, &column("access"))?;

    let mut out = MetricTable::new(kind);
    for ((trace, config), miss) in &misses {
        let access = accesses.get(&(trace.clone(), config.clone())).copied().flatten();
        let value = match (miss, access) {
            (Some(m), Some(a)) if a != 0.0 => Some(m / a),
            _ => None,
        };
        out.insert(trace, config, value);
    }
    Ok(out)
}

/// Select `column`, drop the suite level and key cells by (trace, configuration)
fn pivot(
    table: &FlatTable,
    column: &ColumnKey,
) -> Result<BTreeMap<(String, String), Option<f64>>, MetricError> {
    let cells = table
        .column(column)
        .ok_or_else(|| MetricError::MissingColumn(column_label(column)))?;

    let mut out = BTreeMap::new();
    for (row, scalar) in cells {
        let value = match scalar {
            Some(scalar) => coerce(scalar, &row.trace)?,
            None => None,
        };
        let key = (row.trace.clone(), row.prefetcher.clone());
        if out.insert(key, value).is_some() {
            return Err(MetricError::DuplicateCell {
                trace: row.trace.clone(),
                config: row.prefetcher.clone(),
            });
        }
    }
    Ok(out)
}

/// Numeric view of a cell; nulls and NaN are missing
fn coerce(scalar: &Scalar, trace: &str) -> Result<Option<f64>, MetricError> {
    let value = match scalar {
        Scalar::Number(n) => *n,
        Scalar::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Scalar::Null => return Ok(None),
        Scalar::Text(text) => text.trim().parse::<f64>().map_err(|_| MetricError::NonNumeric {
            trace: trace.to_string(),
            value: text.clone(),
        })?,
    };

    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Every metric must cover the same traces as IPC
fn check_rows(set: &MetricSet) -> Result<(), MetricError> {
    for table in set.tables() {
        if table.traces != set.ipc.traces {
            return Err(MetricError::RowMismatch {
                metric: table.kind.title().to_string(),
                reference: set.ipc.kind.title().to_string(),
            });
        }
    }
    Ok(())
}
