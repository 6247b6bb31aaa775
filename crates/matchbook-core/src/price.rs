//! Fixed-scale decimal price.
//!
//! Prices carry exactly two fractional digits and are stored as an
//! integer count of hundredths, so equality and ordering are exact.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const SCALE: u64 = 100;

/// Non-negative price with two fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Build from a whole number of hundredths (`10453` is `104.53`).
    pub fn from_hundredths(hundredths: u64) -> Self {
        Price(hundredths)
    }

    pub fn hundredths(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / SCALE, self.0 % SCALE)
    }
}

/// A price literal that is not a non-negative decimal with at most two
/// fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid price literal")]
pub struct ParsePriceError;

impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(ParsePriceError);
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParsePriceError);
        }
        let whole: u64 = whole.parse().map_err(|_| ParsePriceError)?;
        let mut cents: u64 = frac.parse().unwrap_or(0);
        if frac.len() == 1 {
            cents *= 10;
        }
        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(cents))
            .map(Price)
            .ok_or(ParsePriceError)
    }
}
