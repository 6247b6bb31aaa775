//! Order type (Market / Limit / IOC).

use std::fmt;

/// How an order executes.
///
/// Limit orders rest in the book and match on match commands. Market
/// and IOC orders execute aggressively on arrival and never rest; a
/// market order crosses at any available price, an IOC only within its
/// limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    Ioc,
}

impl OrderType {
    /// One-letter tag used by the command language and reports.
    pub fn tag(self) -> char {
        match self {
            OrderType::Market => 'M',
            OrderType::Limit => 'L',
            OrderType::Ioc => 'I',
        }
    }

    /// Try to parse from a tag char (`'M'` / `'L'` / `'I'`).
    pub fn from_tag(c: char) -> Option<Self> {
        match c {
            'M' => Some(OrderType::Market),
            'L' => Some(OrderType::Limit),
            'I' => Some(OrderType::Ioc),
            _ => None,
        }
    }

    /// Market and IOC orders execute on arrival and never rest.
    pub fn is_immediate(self) -> bool {
        matches!(self, OrderType::Market | OrderType::Ioc)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
