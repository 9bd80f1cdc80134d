//! Column references: 1-based numbers or spreadsheet letter codes

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A user-supplied column reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// A 1-based column number, e.g. `3`
    Number(usize),
    /// A letter code, e.g. `C` or `AB`, with its resolved 1-based number
    Letters { code: String, number: usize },
}

impl ColumnRef {
    /// Parse a token, trying a number first and then a letter code
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let invalid = || Error::InvalidColumn(token.to_string());

        if let Ok(n) = token.parse::<i64>() {
            return match usize::try_from(n) {
                Ok(number) if number > 0 => Ok(ColumnRef::Number(number)),
                _ => Err(invalid()),
            };
        }

        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let number = letters_to_number(token).ok_or_else(invalid)?;
        Ok(ColumnRef::Letters {
            code: token.to_ascii_uppercase(),
            number,
        })
    }

    /// 1-based column number
    pub fn number(&self) -> usize {
        match self {
            ColumnRef::Number(n) => *n,
            ColumnRef::Letters { number, .. } => *number,
        }
    }

    /// 0-based column index
    pub fn index(&self) -> usize {
        self.number() - 1
    }
}

impl Default for ColumnRef {
    fn default() -> Self {
        ColumnRef::Number(1)
    }
}

impl FromStr for ColumnRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ColumnRef::parse(s)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Number(n) => write!(f, "{}", n),
            ColumnRef::Letters { code, .. } => write!(f, "{}", code),
        }
    }
}

/// Base-26 without a zero digit: A=1, Z=26, AA=27
fn letters_to_number(code: &str) -> Option<usize> {
    code.bytes().try_fold(0usize, |acc, b| {
        let digit = (b.to_ascii_uppercase() - b'A' + 1) as usize;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Resolve a column token to its 1-based number
pub fn resolve(token: &str) -> Result<usize> {
    ColumnRef::parse(token).map(|c| c.number())
}
