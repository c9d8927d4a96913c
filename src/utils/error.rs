//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the stats directory
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk stats directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stats document must be a JSON object: {0}")]
    NotAnObject(PathBuf),

    #[error("Key '{0}' matches neither a stop nor a drop pattern")]
    UnexpectedKey(String),

    #[error("Key '{0}' holds an unsupported value (arrays are not statistics)")]
    UnsupportedValue(String),

    #[error("Key '{0}' appears twice after joining")]
    DuplicateKey(String),

    #[error("Invalid key pattern: {0}")]
    Pattern(#[from] TemplateError),
}

/// Errors from compiling templates or extracting named fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Template '{template}' has no field named '{field}'")]
    UnknownField { template: String, field: String },

    #[error("'{input}' does not match template '{template}'")]
    Mismatch { template: String, input: String },
}

/// Errors raised while reshaping padded paths into the base table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Shape mismatch: {0}")]
    Shape(String),

    #[error("Rows collide after relabeling: {0}")]
    DuplicateRow(String),

    #[error("Failed to relabel row: {0}")]
    Label(#[from] TemplateError),
}

/// Errors raised while deriving metric tables
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("Column {0} not found in table")]
    MissingColumn(String),

    #[error("Value '{value}' at trace '{trace}' is not numeric")]
    NonNumeric { trace: String, value: String },

    #[error("Trace '{trace}' has more than one value for configuration '{config}'")]
    DuplicateCell { trace: String, config: String },

    #[error("Metric '{metric}' covers a different set of traces than '{reference}'")]
    RowMismatch { metric: String, reference: String },
}

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No panels to draw")]
    NoPanels,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Table too large for a worksheet: {0}")]
    TableTooLarge(String),
}

/// Errors from reading or writing the analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
