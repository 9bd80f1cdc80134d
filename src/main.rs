//! csvmerge - Merge two CSV files on a key column

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use csvmerge::config::{DuplicatePolicy, MergeConfig, MergeMode, OutputFormat};
use csvmerge::merge::{FormatSpec, MergeEngine, DEFAULT_FORMAT};
use csvmerge::model::ColumnRef;
use csvmerge::output::render_to_stdout;
use csvmerge::parser::CsvParser;

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_DUPLICATE_KEY: u8 = 3;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Csv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Merges two CSV files in a GNU join way
#[derive(Parser, Debug)]
#[command(name = "csvmerge")]
#[command(author, version, about, long_about = None)]
#[command(
    override_usage = "csvmerge -1 <COLUMN1> -2 <COLUMN2> [-o n.m,...] [--first|--last] [--stop] [--only <0|1|2>] <FILE1> <FILE2>"
)]
struct Cli {
    /// First CSV file
    file1: PathBuf,

    /// Second CSV file
    file2: PathBuf,

    /// Column of the first file (starts at 1, or letters A, B, ..., AA, ...)
    #[arg(short = '1', value_name = "COLUMN1", value_parser = parse_column)]
    column1: ColumnRef,

    /// Column of the second file (starts at 1, or letters A, B, ..., AA, ...)
    #[arg(short = '2', value_name = "COLUMN2", value_parser = parse_column)]
    column2: ColumnRef,

    /// Output format, comma separated n.m where n is the file number and m the
    /// field number or '*' for all fields
    #[arg(short = 'o', value_name = "n.m,...", default_value = DEFAULT_FORMAT, value_parser = parse_format)]
    format: FormatSpec,

    /// Do not continue if a duplicate key is found within the second file
    #[arg(long)]
    stop: bool,

    /// On duplicate keys, use the first instance (default)
    #[arg(long, overrides_with = "last")]
    first: bool,

    /// On duplicate keys, use the last instance
    #[arg(long, overrides_with = "first")]
    last: bool,

    /// Show only the rows of file 1 or file 2 that have no match (0 shows common rows)
    #[arg(long, value_name = "0|1|2", value_parser = clap::value_parser!(u8).range(0..=2))]
    only: Option<u8>,

    /// Output format for the merged rows
    #[arg(long, value_enum, default_value = "csv")]
    output_format: CliOutputFormat,

    /// Field delimiter of both input files and of CSV output
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Print merge statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.stop {
            DuplicatePolicy::Stop
        } else if self.last {
            DuplicatePolicy::Last
        } else {
            DuplicatePolicy::First
        }
    }
}

fn parse_column(s: &str) -> Result<ColumnRef, String> {
    ColumnRef::parse(s).map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<FormatSpec, String> {
    FormatSpec::parse(s).map_err(|e| e.to_string())
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "csvmerge=warn",
        1 => "csvmerge=info",
        2 => "csvmerge=debug",
        _ => "csvmerge=trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<csvmerge::Error>() {
        Some(csvmerge::Error::DuplicateKey { .. }) => EXIT_DUPLICATE_KEY,
        Some(e) if e.is_usage() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mode = MergeMode::from_only(cli.only).context("only must be 0, 1 or 2")?;
    let config = MergeConfig::new(cli.column1.clone(), cli.column2.clone())
        .with_duplicate_policy(cli.duplicate_policy())
        .with_format(cli.format.clone())
        .with_mode(mode);

    info!(
        file1 = %cli.file1.display(),
        file2 = %cli.file2.display(),
        column1 = %config.column1,
        column2 = %config.column2,
        policy = %config.duplicate_policy,
        format = %config.format,
        mode = %config.mode,
        "merging"
    );

    let parser = CsvParser::new().with_delimiter(cli.delimiter);

    let table1 = parser
        .parse_path(&cli.file1)
        .with_context(|| format!("Failed to parse file 1: {}", cli.file1.display()))?;

    let table2 = parser
        .parse_path(&cli.file2)
        .with_context(|| format!("Failed to parse file 2: {}", cli.file2.display()))?;

    let result = MergeEngine::new(&config).merge(&table1, &table2)?;

    render_to_stdout(&result, cli.output_format.into(), cli.delimiter)?;

    if cli.stats {
        let stats = &result.stats;
        eprintln!("File 1: {} ({} rows)", cli.file1.display(), stats.left_row_count);
        eprintln!("File 2: {} ({} rows)", cli.file2.display(), stats.right_row_count);
        eprintln!("Mode:        {}", stats.mode);
        eprintln!("Common rows: {}", stats.common_rows);
        eprintln!("Duplicates:  {}", stats.right_duplicates);
        eprintln!("Emitted:     {}", stats.rows_emitted);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let duplicate = anyhow::Error::from(csvmerge::Error::DuplicateKey {
            key: "X".into(),
            table: 2,
            line: 3,
            first_line: 1,
        });
        assert_eq!(exit_code(&duplicate), EXIT_DUPLICATE_KEY);

        let usage = anyhow::Error::from(csvmerge::Error::InvalidColumn("A1".into()))
            .context("Failed to resolve column");
        assert_eq!(exit_code(&usage), EXIT_USAGE);

        let parse = anyhow::Error::from(csvmerge::Error::UnterminatedQuote {
            source_name: "a.csv".into(),
            line: 1,
        });
        assert_eq!(exit_code(&parse), EXIT_FAILURE);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), EXIT_FAILURE);
    }

    #[test]
    fn test_only_accepts_zero() {
        let cli = Cli::try_parse_from(["csvmerge", "-1", "1", "-2", "1", "--only", "0", "a", "b"])
            .unwrap();
        assert_eq!(MergeMode::from_only(cli.only), Some(MergeMode::Common));
        assert!(
            Cli::try_parse_from(["csvmerge", "-1", "1", "-2", "1", "--only", "3", "a", "b"])
                .is_err()
        );
    }
}
