//! Runtime configuration for the driver.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `MATCHBOOK_BOOK_CAPACITY` (default: 65536)
//!   Bound on orders per side per symbol, active and retained together.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use matchbook_core::DEFAULT_BOOK_CAPACITY;

#[derive(Debug, Clone)]
pub struct Config {
    /// Per-side order bound for every symbol book.
    pub book_capacity: usize,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self> {
        let book_capacity = read_env_or_default("MATCHBOOK_BOOK_CAPACITY", DEFAULT_BOOK_CAPACITY)?;
        Ok(Config { book_capacity })
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| anyhow!("invalid {key}={value}: {e}")),
        Err(_) => Ok(default),
    }
}
