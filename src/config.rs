//! Configuration handling for csvmerge

use std::fmt;

use serde::Serialize;

use crate::merge::FormatSpec;
use crate::model::ColumnRef;

/// How repeated keys within one file are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the merge
    Stop,
    /// Keep the first row seen
    #[default]
    First,
    /// Keep the last row seen
    Last,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(DuplicatePolicy::Stop),
            "first" => Ok(DuplicatePolicy::First),
            "last" => Ok(DuplicatePolicy::Last),
            _ => Err(format!("Unknown duplicate policy: {}", s)),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Stop => write!(f, "stop"),
            DuplicatePolicy::First => write!(f, "first"),
            DuplicatePolicy::Last => write!(f, "last"),
        }
    }
}

/// Which rows are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Rows of file 1 whose key is also in file 2
    #[default]
    Common,
    /// Rows of file 1 whose key is not in file 2
    LeftOnly,
    /// Rows of file 2 whose key is not in file 1
    RightOnly,
}

impl MergeMode {
    /// Map the `--only` value (absent, 1 or 2) to a mode
    pub fn from_only(only: Option<u8>) -> Option<Self> {
        match only {
            None | Some(0) => Some(MergeMode::Common),
            Some(1) => Some(MergeMode::LeftOnly),
            Some(2) => Some(MergeMode::RightOnly),
            Some(_) => None,
        }
    }
}

impl std::str::FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "common" | "0" => Ok(MergeMode::Common),
            "left-only" | "1" => Ok(MergeMode::LeftOnly),
            "right-only" | "2" => Ok(MergeMode::RightOnly),
            _ => Err(format!("Unknown merge mode: {}", s)),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Common => write!(f, "common"),
            MergeMode::LeftOnly => write!(f, "left-only"),
            MergeMode::RightOnly => write!(f, "right-only"),
        }
    }
}

/// Output format for merged rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a merge, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    /// Key column of file 1
    pub column1: ColumnRef,
    /// Key column of file 2
    pub column2: ColumnRef,
    /// Duplicate key handling
    pub duplicate_policy: DuplicatePolicy,
    /// Layout of each output row
    pub format: FormatSpec,
    /// Which rows are emitted
    pub mode: MergeMode,
}

impl MergeConfig {
    /// Create a config keyed on the given columns, defaults elsewhere
    pub fn new(column1: ColumnRef, column2: ColumnRef) -> Self {
        Self {
            column1,
            column2,
            ..Default::default()
        }
    }

    /// Set the duplicate key policy
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the output row layout
    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = format;
        self
    }

    /// Set the merge mode
    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }
}
