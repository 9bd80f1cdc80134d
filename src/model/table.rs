//! Table and Row data structures

/// A row of text fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Field values in column order
    pub fields: Vec<String>,
    /// Original line number in source file (1-indexed, 0 for synthesized rows)
    pub source_line: usize,
}

impl Row {
    /// Create a new row
    pub fn new(fields: Vec<String>, source_line: usize) -> Self {
        Self {
            fields,
            source_line,
        }
    }

    /// A row of `width` empty fields, used for the missing side of one-sided output
    pub fn blank(width: usize) -> Self {
        Self {
            fields: vec![String::new(); width],
            source_line: 0,
        }
    }

    /// Get a field by 0-based index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Trimmed value of the key field, empty when the field is missing
    pub fn key(&self, column: usize) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect(), 0)
    }
}

/// A table of rows, rectangular once normalized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// All rows in source order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from rows, without normalizing
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from plain records, numbering lines from 1
    pub fn from_records<R, S>(records: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                Row::new(record.into_iter().map(Into::into).collect(), i + 1)
            })
            .collect();
        Self { rows }
    }

    /// Length of the longest row
    pub fn max_row_length(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    /// Pad every row with empty fields up to the longest row's length
    pub fn normalize(&mut self) {
        let width = self.max_row_length();
        for row in &mut self.rows {
            if row.fields.len() < width {
                row.fields.resize(width, String::new());
            }
        }
    }

    /// Width of the table (the longest row)
    pub fn width(&self) -> usize {
        self.max_row_length()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A blank row as wide as this table
    pub fn blank_row(&self) -> Row {
        Row::blank(self.width())
    }
}
