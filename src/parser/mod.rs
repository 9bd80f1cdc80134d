//! Parser layer for reading delimited text into tables

mod csv;

pub use self::csv::CsvParser;
