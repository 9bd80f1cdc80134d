//! Output formatting for merged rows

mod csv;
mod json;

use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::merge::MergeResult;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render merge result to a writer
    fn render(&self, result: &MergeResult, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat, delimiter: u8) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Csv => Box::new(CsvOutput::new().with_delimiter(delimiter)),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render merge result to stdout
pub fn render_to_stdout(result: &MergeResult, format: OutputFormat, delimiter: u8) -> Result<()> {
    let formatter = OutputFactory::create(format, delimiter);
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    formatter.render(result, &mut lock)
}
