//! JSON output format

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::merge::{MergeResult, MergeStats};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonMerge<'a> {
    rows: &'a [Vec<String>],
    stats: &'a MergeStats,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, result: &MergeResult, writer: &mut dyn Write) -> Result<()> {
        let doc = JsonMerge {
            rows: &result.rows,
            stats: &result.stats,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &doc)?;
        } else {
            serde_json::to_writer(&mut *writer, &doc)?;
        }
        writeln!(writer).map_err(serde_json::Error::io)?;

        Ok(())
    }
}
