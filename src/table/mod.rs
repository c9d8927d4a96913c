//! Reshaping of nested statistics into the base table.
//!
//! Pipeline: `flatten` -> `pad_paths` -> `build_table`.

pub mod builder;
pub mod flatten;
pub mod pad;

// Re-export main types and functions
pub use builder::{
    build_table, column_label, relabel_rows, unstack, ColumnKey, FlatTable, RawTable, RowKey,
    RowLabeler, Table, COLUMN_LEVELS,
};
pub use flatten::{flatten, unflatten, FlatMap, PathKey};
pub use pad::{max_depth, pad_paths, PaddedMap, PaddedPathKey, Segment};
