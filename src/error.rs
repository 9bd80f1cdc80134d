//! Error types for csvmerge

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or merging tables
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or write a file
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing error from the csv crate
    #[error("CSV error in '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// A column reference that is neither a positive number nor a letter code
    #[error("invalid column reference '{0}': expected a positive number or letters (A, B, ..., AA, ...)")]
    InvalidColumn(String),

    /// A quoted field that is still open at the end of the source
    #[error("CSV error in '{source_name}': unterminated quoted field starting at line {line}")]
    UnterminatedQuote { source_name: String, line: usize },

    /// A malformed output format specification
    #[error("invalid format '{spec}': {reason}")]
    InvalidFormat { spec: String, reason: String },

    /// Repeated key under the `stop` duplicate policy
    #[error("duplicate key '{key}' in file {table} at line {line} (first seen at line {first_line})")]
    DuplicateKey {
        key: String,
        table: u8,
        line: usize,
        first_line: usize,
    },

    /// Key column beyond the width of its table
    #[error("column {column} does not exist in file {table} (it has {width} columns)")]
    ColumnOutOfRange {
        table: u8,
        column: usize,
        width: usize,
    },

    /// Format selector referencing a missing field
    #[error("field {table}.{field} does not exist (file {table} rows have {width} fields)")]
    FieldOutOfRange {
        table: u8,
        field: usize,
        width: usize,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was caused by user input rather than the data
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidColumn(_) | Error::InvalidFormat { .. })
    }
}
