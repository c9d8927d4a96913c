//! Stats parsing and record model.
//!
//! This module handles:
//! - Walking the stats directory
//! - Filtering each JSON document with stop/drop key patterns
//! - Extracting named fields from configuration and trace labels

pub mod loader;
pub mod schema;
pub mod stats_file;
pub mod template;

// Re-export main types
pub use loader::{load_stats_dir, load_stats_file};
pub use schema::{NestedRecord, Node, Scalar};
pub use stats_file::{parse_stats, KeyFilter};
pub use template::{KeyPattern, NamedFieldParser};
