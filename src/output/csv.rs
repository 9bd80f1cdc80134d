//! CSV output, one record per line

use std::io::Write;

use crate::error::{Error, Result};
use crate::merge::MergeResult;

use super::OutputFormatter;

/// CSV output formatter
pub struct CsvOutput {
    delimiter: u8,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CsvOutput {
    fn render(&self, result: &MergeResult, writer: &mut dyn Write) -> Result<()> {
        let to_error = |source: csv::Error| Error::Csv {
            source_name: "<output>".to_string(),
            source,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        for row in &result.rows {
            csv_writer.write_record(row).map_err(to_error)?;
        }
        csv_writer.flush().map_err(|source| Error::Io {
            path: "<output>".to_string(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rows: Vec<Vec<&str>>) -> String {
        let result = MergeResult {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            ..Default::default()
        };
        let mut out = Vec::new();
        CsvOutput::new().render(&result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_rows() {
        assert_eq!(
            render(vec![vec!["2", "banana", "2", "red"], vec!["1", "", "", ""]]),
            "2,banana,2,red\n1,,,\n"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(
            render(vec![vec!["a,b", "say \"hi\"", "x\ny"]]),
            "\"a,b\",\"say \"\"hi\"\"\",\"x\ny\"\n"
        );
    }

    #[test]
    fn test_no_rows() {
        assert_eq!(render(vec![]), "");
    }
}
