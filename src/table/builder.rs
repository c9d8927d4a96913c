//! Long-to-wide reshape of padded paths.
//!
//! A padded key of depth L is split into a row part (first L-3 levels) and
//! a column part (last 3 levels). For the standard layout the row part is
//! `(configuration, suite, stats file)` and the columns look like
//! `(roi-stats.cpu0.L1I, load, miss)` or `(roi-stats.cpu0.ipc-cumulative, -, -)`.
//!
//! Row labels are then rewritten by the named-field parsers: the
//! configuration descriptor becomes its L1I prefetcher token and the stats
//! file name becomes its trace name.

use super::pad::{PaddedMap, Segment};
use crate::parser::schema::Scalar;
use crate::parser::template::NamedFieldParser;
use crate::utils::config::LabelConfig;
use crate::utils::error::{TableError, TemplateError};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Number of trailing key levels moved into the column index
pub const COLUMN_LEVELS: usize = 3;

/// Number of row levels the relabeler expects
pub const ROW_LEVELS: usize = 3;

/// Three-level column label
pub type ColumnKey = [Segment; COLUMN_LEVELS];

/// Render a column label as `a / b / c`
pub fn column_label(column: &ColumnKey) -> String {
    column
        .iter()
        .map(Segment::label)
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Relabeled row identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    /// Prefetcher token extracted from the configuration descriptor
    pub prefetcher: String,
    /// Directory level between configuration and stats file
    pub suite: String,
    /// Trace name extracted from the stats file name
    pub trace: String,
}

/// Two-dimensional table; absent cells are missing values
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R: Ord> {
    columns: BTreeSet<ColumnKey>,
    rows: BTreeMap<R, BTreeMap<ColumnKey, Scalar>>,
}

/// Table indexed by the raw row levels
pub type RawTable = Table<Vec<Segment>>;

/// Base table after row relabeling
pub type FlatTable = Table<RowKey>;

impl<R: Ord> Default for Table<R> {
    fn default() -> Self {
        Self {
            columns: BTreeSet::new(),
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Ord> Table<R> {
    pub fn columns(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.keys()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, column: &ColumnKey) -> bool {
        self.columns.contains(column)
    }

    /// Cell value; `None` marks a missing combination
    pub fn get(&self, row: &R, column: &ColumnKey) -> Option<&Scalar> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Every row with its value in `column`, or `None` if the column does not exist
    pub fn column(&self, column: &ColumnKey) -> Option<Vec<(&R, Option<&Scalar>)>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|(row, cells)| (row, cells.get(column)))
                .collect(),
        )
    }
}

/// Move the trailing `COLUMN_LEVELS` levels of every key into the column index
///
/// # Errors
/// * `TableError::Shape` - keys are shorter than `COLUMN_LEVELS + 1` or of
///   unequal length
pub fn unstack(padded: &PaddedMap) -> Result<RawTable, TableError> {
    let mut table = RawTable::default();
    let Some(depth) = padded.keys().next().map(|k| k.len()) else {
        return Ok(table);
    };

    if depth <= COLUMN_LEVELS {
        return Err(TableError::Shape(format!(
            "paths of depth {} leave no row levels after moving {} to columns",
            depth, COLUMN_LEVELS
        )));
    }

    for (key, value) in padded {
        if key.len() != depth {
            return Err(TableError::Shape(format!(
                "path '{}' has depth {}, expected {}",
                key,
                key.len(),
                depth
            )));
        }

        let (row, column) = key.segments().split_at(depth - COLUMN_LEVELS);
        let column: ColumnKey = [column[0].clone(), column[1].clone(), column[2].clone()];

        table.columns.insert(column.clone());
        table
            .rows
            .entry(row.to_vec())
            .or_default()
            .insert(column, value.clone());
    }

    debug!(
        "Unstacked {} values into {} rows x {} columns",
        padded.len(),
        table.row_count(),
        table.column_count()
    );

    Ok(table)
}

/// Rewrites raw row levels into a `RowKey`
#[derive(Debug, Clone)]
pub struct RowLabeler {
    config: NamedFieldParser,
    trace: NamedFieldParser,
}

impl RowLabeler {
    pub fn new(config: NamedFieldParser, trace: NamedFieldParser) -> Self {
        Self { config, trace }
    }

    pub fn from_config(labels: &LabelConfig) -> Result<Self, TemplateError> {
        Ok(Self::new(
            NamedFieldParser::new(&labels.config_template, &labels.config_field)?,
            NamedFieldParser::new(&labels.trace_template, &labels.trace_field)?,
        ))
    }

    /// Relabel `(configuration, suite, stats file)`
    pub fn label(&self, row: &[Segment]) -> Result<RowKey, TableError> {
        let keys: Vec<&str> = row.iter().filter_map(Segment::as_key).collect();
        let [config, suite, file] = keys[..] else {
            return Err(TableError::Shape(format!(
                "row '{}' needs exactly {} named levels",
                row.iter().map(Segment::label).collect::<Vec<_>>().join(" / "),
                ROW_LEVELS
            )));
        };
        if keys.len() != row.len() {
            return Err(TableError::Shape(format!(
                "row '{}' contains padding",
                keys.join(" / ")
            )));
        }

        Ok(RowKey {
            prefetcher: self.config.extract(config)?,
            suite: suite.to_string(),
            trace: self.trace.extract(file)?,
        })
    }
}

/// Replace every raw row index by its relabeled `RowKey`
///
/// # Errors
/// * `TableError::Label` - a label does not match its template
/// * `TableError::DuplicateRow` - two raw rows map onto the same `RowKey`
pub fn relabel_rows(raw: RawTable, labeler: &RowLabeler) -> Result<FlatTable, TableError> {
    let mut table = FlatTable {
        columns: raw.columns,
        rows: BTreeMap::new(),
    };

    for (row, cells) in raw.rows {
        let key = labeler.label(&row)?;
        if table.rows.contains_key(&key) {
            return Err(TableError::DuplicateRow(format!(
                "{} / {} / {}",
                key.prefetcher, key.suite, key.trace
            )));
        }
        table.rows.insert(key, cells);
    }

    Ok(table)
}

/// Build the base table from padded paths
///
/// **Public** - main entry point for table construction
pub fn build_table(padded: &PaddedMap, labeler: &RowLabeler) -> Result<FlatTable, TableError> {
    let raw = unstack(padded)?;
    relabel_rows(raw, labeler)
}
