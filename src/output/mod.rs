//! Exports of the analysis results.
//!
//! Renderers produce bytes or text in memory:
//! - Excel workbook of the base table
//! - CSV files per metric and per summary
//! - summary.json
//! - Terminal tables
//!
//! `OutputBundle` then writes everything in one pass.

pub mod console;
pub mod csv;
pub mod excel;
pub mod file;
pub mod json;

// Re-export main functions
pub use console::{render_metric_table, render_summary};
pub use self::csv::{metric_csv, summary_csv};
pub use excel::render_workbook;
pub use file::{write_output, OutputBundle, OutputFile};
pub use json::{summary_json, SummaryReport};
