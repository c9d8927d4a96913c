//! CLI command implementations.
//!
//! Commands orchestrate the library components and report through
//! `anyhow` errors with context.

pub mod models;
pub mod summarize;
pub mod utils;

// Re-export main command functions
pub use models::SummarizeArgs;
pub use summarize::{analyze, execute_summarize, render_outputs, Analysis};
pub use utils::{display_version, inspect_file, print_config};
