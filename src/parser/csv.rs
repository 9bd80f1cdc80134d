//! CSV file parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Row, Table};

/// Parser for headerless CSV files with rows of any length
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    /// Create a comma-separated parser
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use another single-byte delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a file into a normalized table
    pub fn parse_path(&self, path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse any reader into a normalized table; `source_name` labels errors.
    ///
    /// Blank lines become empty rows, padded like any short row.
    pub fn parse_reader<R: Read>(&self, mut reader: R, source_name: &str) -> Result<Table> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(|source| Error::Io {
            path: source_name.to_string(),
            source,
        })?;

        let slots = scan_layout(&input, self.delimiter).map_err(|line| {
            Error::UnterminatedQuote {
                source_name: source_name.to_string(),
                line,
            }
        })?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(input.as_slice());
        let to_error = |source: csv::Error| Error::Csv {
            source_name: source_name.to_string(),
            source,
        };

        let mut records = csv_reader.records();
        let mut rows = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Blank { line } => rows.push(Row::new(Vec::new(), line)),
                Slot::Record { line } => match records.next() {
                    Some(result) => {
                        let record = result.map_err(to_error)?;
                        rows.push(Row::new(record.iter().map(str::to_string).collect(), line));
                    }
                    None => break,
                },
            }
        }
        for result in records {
            let record = result.map_err(to_error)?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            rows.push(Row::new(record.iter().map(str::to_string).collect(), line));
        }

        let mut table = Table::new(rows);
        table.normalize();

        debug!(
            source = source_name,
            rows = table.row_count(),
            width = table.width(),
            "loaded table"
        );

        Ok(table)
    }
}

/// Start of one record in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Record { line: usize },
    Blank { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    RecordStart,
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

const QUOTE: u8 = b'"';

/// Locate record starts and blank lines with the quoting rules of the `csv`
/// reader. `\r`, `\n` and `\r\n` all end a record.
///
/// Fails with the opening line of a quoted field that never closes.
fn scan_layout(input: &[u8], delimiter: u8) -> std::result::Result<Vec<Slot>, usize> {
    let mut slots = Vec::new();
    let mut state = ScanState::RecordStart;
    let mut line = 1;
    let mut quote_line = 0;
    let mut prev_cr = false;

    for &b in input {
        let after_cr = std::mem::replace(&mut prev_cr, b == b'\r');
        let terminator = b == b'\n' || b == b'\r';

        if state == ScanState::RecordStart {
            match b {
                b'\n' if after_cr => {}
                _ if terminator => slots.push(Slot::Blank { line }),
                _ => {
                    slots.push(Slot::Record { line });
                    state = ScanState::FieldStart;
                }
            }
        }

        state = match state {
            ScanState::RecordStart => ScanState::RecordStart,
            ScanState::FieldStart if b == QUOTE => {
                quote_line = line;
                ScanState::Quoted
            }
            ScanState::FieldStart | ScanState::Unquoted | ScanState::QuoteInQuoted
                if b == delimiter =>
            {
                ScanState::FieldStart
            }
            ScanState::FieldStart | ScanState::Unquoted | ScanState::QuoteInQuoted
                if terminator =>
            {
                ScanState::RecordStart
            }
            ScanState::FieldStart | ScanState::Unquoted => ScanState::Unquoted,
            ScanState::Quoted if b == QUOTE => ScanState::QuoteInQuoted,
            ScanState::Quoted => ScanState::Quoted,
            ScanState::QuoteInQuoted if b == QUOTE => ScanState::Quoted,
            ScanState::QuoteInQuoted => ScanState::Unquoted,
        };

        if b == b'\n' {
            line += 1;
        }
    }

    if state == ScanState::Quoted {
        return Err(quote_line);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Table> {
        CsvParser::new().parse_reader(input.as_bytes(), "test")
    }

    #[test]
    fn test_pads_short_rows() {
        let table = parse("1,a,x\n2\n3,c\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows[1].fields, vec!["2", "", ""]);
        assert_eq!(table.rows[2].fields, vec!["3", "c", ""]);
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse("1,\"hello, world\"\n2,\"multi\nline\"\n3,\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows[0].fields[1], "hello, world");
        assert_eq!(table.rows[1].fields[1], "multi\nline");
        assert_eq!(table.rows[2].fields[1], "say \"hi\"");
    }

    #[test]
    fn test_first_row_is_data() {
        let table = parse("id,name\n1,a\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].fields, vec!["id", "name"]);
    }

    #[test]
    fn test_source_lines() {
        let table = parse("a\n\"b\nc\"\nd\n").unwrap();
        assert_eq!(table.rows[0].source_line, 1);
        assert_eq!(table.rows[1].source_line, 2);
        assert_eq!(table.rows[2].source_line, 4);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes: &[u8] = b"1,\xff\xfe\n";
        let err = CsvParser::new().parse_reader(bytes, "bad.csv").unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = CsvParser::new()
            .with_delimiter(b';')
            .parse_reader("1;a,b\n".as_bytes(), "test")
            .unwrap();
        assert_eq!(table.rows[0].fields, vec!["1", "a,b"]);
    }

    #[test]
    fn test_missing_file() {
        let err = CsvParser::new()
            .parse_path(Path::new("/nonexistent/input.csv"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        let err = parse("1,\"abc\n2,x\n").unwrap_err();
        match err {
            Error::UnterminatedQuote { source_name, line } => {
                assert_eq!(source_name, "test");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(parse("1,a\n2,\"b\"\"\n").is_err());
    }

    #[test]
    fn test_closed_quotes_across_lines() {
        let table = parse("1,\"a\n\n b\"\n2,\"c\"\"\"\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].fields[1], "a\n\n b");
        assert_eq!(table.rows[1].fields[1], "c\"");
        assert_eq!(table.rows[1].source_line, 4);
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let table = parse("a\"b,c\n").unwrap();
        assert_eq!(table.rows[0].fields, vec!["a\"b", "c"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let table = parse("1,apple\n\n2,banana\n\n").unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows[1].fields, vec!["", ""]);
        assert_eq!(table.rows[1].source_line, 2);
        assert_eq!(table.rows[2].fields, vec!["2", "banana"]);
        assert_eq!(table.rows[2].source_line, 3);
        assert_eq!(table.rows[3].source_line, 4);
    }

    #[test]
    fn test_crlf_terminators() {
        let table = parse("1,a\r\n\r\n2,b\r\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0].fields, vec!["1", "a"]);
        assert_eq!(table.rows[1].fields, vec!["", ""]);
        assert_eq!(table.rows[2].fields, vec!["2", "b"]);
    }

    #[test]
    fn test_blank_lines_with_delimiter() {
        let table = CsvParser::new()
            .with_delimiter(b';')
            .parse_reader("\"x;y\";1\n\n".as_bytes(), "test")
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].fields, vec!["x;y", "1"]);
        assert!(table.rows[1].fields.iter().all(String::is_empty));
    }

    #[test]
    fn test_empty_input() {
        let table = parse("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
    }
}
