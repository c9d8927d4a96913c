//! Metric derivation and aggregation.
//!
//! This module transforms the base table into:
//! - Per-metric tables (traces x configurations)
//! - Per-configuration summary vectors

pub mod metrics;
pub mod summary;

// Re-export main types and functions
pub use metrics::{
    derive_ipc, derive_metrics, derive_miss_rate, derive_speedup, relative_to, MetricKind,
    MetricSet, MetricTable,
};
pub use summary::{
    arithmetic_mean, geometric_mean, harmonic_mean, summarize, Reduction, SummaryVector,
};
