//! Key index over one table

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::DuplicatePolicy;
use crate::error::{Error, Result};

use super::table::{Row, Table};

/// Mapping from trimmed key value to a representative row
#[derive(Debug)]
pub struct KeyIndex<'a> {
    entries: IndexMap<&'a str, &'a Row>,
    duplicates: usize,
}

impl<'a> KeyIndex<'a> {
    /// Index `table` on `column` (0-based), resolving repeated keys with `policy`.
    ///
    /// `table_number` (1 or 2) is only used to label errors.
    pub fn build(
        table: &'a Table,
        table_number: u8,
        column: usize,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut entries: IndexMap<&'a str, &'a Row> = IndexMap::with_capacity(table.row_count());
        let mut duplicates = 0;

        for row in &table.rows {
            let key = row.key(column);
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(mut slot) => {
                    duplicates += 1;
                    match policy {
                        DuplicatePolicy::Stop => {
                            return Err(Error::DuplicateKey {
                                key: key.to_string(),
                                table: table_number,
                                line: row.source_line,
                                first_line: slot.get().source_line,
                            });
                        }
                        DuplicatePolicy::First => {
                            trace!(key, line = row.source_line, "duplicate key, keeping first");
                        }
                        DuplicatePolicy::Last => {
                            trace!(key, line = row.source_line, "duplicate key, keeping last");
                            slot.insert(row);
                        }
                    }
                }
            }
        }

        debug!(
            table = table_number,
            keys = entries.len(),
            duplicates,
            "built key index"
        );

        Ok(Self {
            entries,
            duplicates,
        })
    }

    /// Look up the representative row for a key
    pub fn get(&self, key: &str) -> Option<&'a Row> {
        self.entries.get(key).copied()
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows whose key had already been seen
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
