//! Ticker symbols: one to four uppercase ASCII letters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Longest symbol the command language admits.
pub const MAX_SYMBOL_LEN: usize = 4;

/// Validated instrument symbol, e.g. `"AB"` or `"ALN"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A symbol that is empty, too long, or not all uppercase ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid symbol")]
pub struct ParseSymbolError;

impl FromStr for Symbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_SYMBOL_LEN {
            return Err(ParseSymbolError);
        }
        if !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ParseSymbolError);
        }
        Ok(Symbol(s.to_string()))
    }
}
