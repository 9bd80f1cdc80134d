//! Merge engine for joining two tables on a key column

mod format;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

use crate::config::{MergeConfig, MergeMode};
use crate::error::{Error, Result};
use crate::model::{ColumnRef, KeyIndex, Table};

pub use format::{format_rows, FieldSelector, FormatSpec, Selector, DEFAULT_FORMAT};

/// Statistics about a merge
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub mode: MergeMode,
    pub left_row_count: usize,
    pub right_row_count: usize,
    pub left_width: usize,
    pub right_width: usize,
    /// Distinct keys of file 2
    pub right_keys: usize,
    /// Rows of file 2 whose key repeats an earlier one
    pub right_duplicates: usize,
    /// Rows of file 1 whose key is also in file 2
    pub common_rows: usize,
    pub rows_emitted: usize,
}

/// Result of merging two tables
#[derive(Debug, Default)]
pub struct MergeResult {
    /// Output rows, in the order of the driving file
    pub rows: Vec<Vec<String>>,
    pub stats: MergeStats,
}

/// Keys of file 1 that also appear in file 2
#[derive(Debug)]
pub struct CommonKeys<'a> {
    keys: FxHashSet<&'a str>,
    occurrences: usize,
}

impl<'a> CommonKeys<'a> {
    /// Test every file 1 row independently against the keys of file 2
    pub fn compute(left: &'a Table, left_column: usize, right: &KeyIndex<'_>) -> Self {
        let mut keys = FxHashSet::default();
        let mut occurrences = 0;

        for row in &left.rows {
            let key = row.key(left_column);
            if right.contains(key) {
                keys.insert(key);
                occurrences += 1;
            }
        }

        Self { keys, occurrences }
    }

    /// Check whether a key is common to both files
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct common keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is common
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of file 1 rows carrying a common key
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }
}

/// Main merge engine
pub struct MergeEngine<'c> {
    config: &'c MergeConfig,
}

impl<'c> MergeEngine<'c> {
    /// Create a new merge engine with configuration
    pub fn new(config: &'c MergeConfig) -> Self {
        Self { config }
    }

    /// Merge two normalized tables
    pub fn merge(&self, left: &Table, right: &Table) -> Result<MergeResult> {
        let config = self.config;
        let column1 = resolve_column(left, 1, &config.column1)?;
        let column2 = resolve_column(right, 2, &config.column2)?;

        let index = KeyIndex::build(right, 2, column2, config.duplicate_policy)?;
        let common = CommonKeys::compute(left, column1, &index);

        let mut stats = MergeStats {
            mode: config.mode,
            left_row_count: left.row_count(),
            right_row_count: right.row_count(),
            left_width: left.width(),
            right_width: right.width(),
            right_keys: index.len(),
            right_duplicates: index.duplicates(),
            common_rows: common.occurrences(),
            rows_emitted: 0,
        };

        let mut rows = Vec::new();
        match config.mode {
            MergeMode::Common => {
                for row in &left.rows {
                    if let Some(matched) = index.get(row.key(column1)) {
                        rows.push(config.format.apply(&row.fields, &matched.fields)?);
                    }
                }
            }
            MergeMode::LeftOnly => {
                let blank = right.blank_row();
                for row in &left.rows {
                    if !common.contains(row.key(column1)) {
                        rows.push(config.format.apply(&row.fields, &blank.fields)?);
                    }
                }
            }
            MergeMode::RightOnly => {
                let blank = left.blank_row();
                for row in &right.rows {
                    if !common.contains(row.key(column2)) {
                        rows.push(config.format.apply(&blank.fields, &row.fields)?);
                    }
                }
            }
        }

        stats.rows_emitted = rows.len();
        debug!(
            mode = %config.mode,
            common_keys = common.len(),
            common_rows = stats.common_rows,
            emitted = stats.rows_emitted,
            "merge complete"
        );

        Ok(MergeResult { rows, stats })
    }
}

/// Check a key column against the table it addresses
fn resolve_column(table: &Table, table_number: u8, column: &ColumnRef) -> Result<usize> {
    let index = column.index();
    let width = table.width();
    if !table.is_empty() && index >= width {
        return Err(Error::ColumnOutOfRange {
            table: table_number,
            column: column.number(),
            width,
        });
    }
    Ok(index)
}

/// Normalize both tables and merge them
pub fn merge(mut left: Table, mut right: Table, config: &MergeConfig) -> Result<MergeResult> {
    left.normalize();
    right.normalize();
    MergeEngine::new(config).merge(&left, &right)
}
