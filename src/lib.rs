//! simstats-summary
//!
//! Turns a directory tree of per-run simulator statistics into per-metric
//! tables (IPC, speedup, miss rates), per-configuration summaries and
//! exports.
//!
//! This crate provides the core implementation for the `simstats` CLI
//! tool. The pipeline, in order:
//!
//! 1. [`parser`] loads `<config>/<suite>/<file>.stats` into a nested record
//! 2. [`table`] flattens, pads and unstacks it into the base table
//! 3. [`aggregator`] derives metric tables and summary vectors
//! 4. [`output`] and [`chart`] render the exports
//!
//! ```bash
//! simstats summarize --stats-dir eval/stats/formatted --out-dir eval/summary
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod table;
pub mod utils;
