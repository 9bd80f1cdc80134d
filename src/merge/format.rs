//! Output row layout: GNU join style `-o` selectors

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default layout: every field of file 1, then every field of file 2
pub const DEFAULT_FORMAT: &str = "1.*,2.*";

/// Fields taken from the selected row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelector {
    /// `*`: every field
    All,
    /// A single 1-based field
    Field(usize),
}

/// One `<file>.<field>` selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    /// 1 or 2
    pub table: u8,
    pub field: FieldSelector,
}

impl Selector {
    fn parse(token: &str, spec: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidFormat {
            spec: spec.to_string(),
            reason,
        };

        let token = token.trim();
        let (table, field) = token
            .split_once('.')
            .ok_or_else(|| invalid(format!("selector '{}' is not of the form n.m", token)))?;

        let table = match table.trim() {
            "1" => 1,
            "2" => 2,
            other => {
                return Err(invalid(format!(
                    "file number must be 1 or 2, got '{}'",
                    other
                )))
            }
        };

        let field = match field.trim() {
            "*" => FieldSelector::All,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => FieldSelector::Field(n),
                _ => {
                    return Err(invalid(format!(
                        "field must be '*' or a positive number, got '{}'",
                        other
                    )))
                }
            },
        };

        Ok(Self { table, field })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            FieldSelector::All => write!(f, "{}.*", self.table),
            FieldSelector::Field(n) => write!(f, "{}.{}", self.table, n),
        }
    }
}

/// A parsed output layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    selectors: Vec<Selector>,
}

impl FormatSpec {
    /// Parse a comma-separated list of selectors
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.trim().is_empty() {
            return Err(Error::InvalidFormat {
                spec: spec.to_string(),
                reason: "no selectors".to_string(),
            });
        }

        let selectors = spec
            .split(',')
            .map(|token| Selector::parse(token, spec))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { selectors })
    }

    /// Selectors in output order
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Build an output row from a file 1 row and a file 2 row
    pub fn apply(&self, row1: &[String], row2: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(self.output_width_hint(row1.len(), row2.len()));

        for selector in &self.selectors {
            let row = if selector.table == 1 { row1 } else { row2 };
            match selector.field {
                FieldSelector::All => out.extend(row.iter().cloned()),
                FieldSelector::Field(n) => {
                    let value = row.get(n - 1).ok_or(Error::FieldOutOfRange {
                        table: selector.table,
                        field: n,
                        width: row.len(),
                    })?;
                    out.push(value.clone());
                }
            }
        }

        Ok(out)
    }

    fn output_width_hint(&self, len1: usize, len2: usize) -> usize {
        self.selectors
            .iter()
            .map(|s| match (s.field, s.table) {
                (FieldSelector::All, 1) => len1,
                (FieldSelector::All, _) => len2,
                (FieldSelector::Field(_), _) => 1,
            })
            .sum()
    }
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            selectors: vec![
                Selector {
                    table: 1,
                    field: FieldSelector::All,
                },
                Selector {
                    table: 2,
                    field: FieldSelector::All,
                },
            ],
        }
    }
}

impl FromStr for FormatSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FormatSpec::parse(s)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

/// Format a pair of rows with a textual layout
pub fn format_rows(row1: &[String], row2: &[String], spec: &str) -> Result<Vec<String>> {
    FormatSpec::parse(spec)?.apply(row1, row2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_then_field() {
        let out = format_rows(&strings(&["a", "b"]), &strings(&["c", "d"]), "1.*,2.1").unwrap();
        assert_eq!(out, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_right_first() {
        let out = format_rows(&strings(&["a", "b"]), &strings(&["c", "d"]), "2.*,1.2").unwrap();
        assert_eq!(out, strings(&["c", "d", "b"]));
    }

    #[test]
    fn test_repeated_and_spaced_selectors() {
        let out = format_rows(&strings(&["a", "b"]), &strings(&["c"]), " 1.2 , 1.2,2.1").unwrap();
        assert_eq!(out, strings(&["b", "b", "c"]));
    }

    #[test]
    fn test_default_matches_text() {
        assert_eq!(FormatSpec::parse(DEFAULT_FORMAT).unwrap(), FormatSpec::default());
        assert_eq!(FormatSpec::default().to_string(), DEFAULT_FORMAT);
    }

    #[test]
    fn test_field_out_of_range() {
        let err = format_rows(&strings(&["a"]), &strings(&["c"]), "1.1,2.3").unwrap_err();
        match err {
            Error::FieldOutOfRange {
                table,
                field,
                width,
            } => {
                assert_eq!((table, field, width), (2, 3, 1));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_selectors() {
        for spec in ["", "1", "3.1", "1.0", "1.x", "1.*,", "a.b", "1.-2", "0.*"] {
            assert!(
                matches!(FormatSpec::parse(spec), Err(Error::InvalidFormat { .. })),
                "spec {:?} should be rejected",
                spec
            );
        }
    }
}
