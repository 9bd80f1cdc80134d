//! csvmerge - Merge two CSV files on a key column
//!
//! Joins two headerless comma-separated tables GNU `join` style: rows sharing
//! a trimmed key value are combined under a `-o`-like output layout, or the
//! unmatched rows of either side are listed.

pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{DuplicatePolicy, MergeConfig, MergeMode};
pub use error::{Error, Result};
pub use merge::{merge, FormatSpec, MergeResult};
pub use model::{ColumnRef, Table};
