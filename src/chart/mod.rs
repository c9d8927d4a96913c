//! Bar chart generation.
//!
//! Converts metric tables and summary vectors into SVG documents.

pub mod generator;

// Re-export main types
pub use generator::{render_average, render_detailed, BarPanel};
