//! Commands consumed by the engine.
//!
//! These are the logical messages the line parser produces. The engine
//! treats them as structurally validated and enforces only the
//! monotonic-timestamp rule itself.

use crate::order_type::OrderType;
use crate::price::Price;
use crate::side::Side;
use crate::symbol::Symbol;
use crate::{OrderId, Quantity, Timestamp};

/// A request into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Admit a new order into a symbol's book.
    New(NewOrder),

    /// Rewrite price and quantity of a resting order.
    Amend(AmendOrder),

    /// Cancel a resting order by id.
    Cancel(CancelOrder),

    /// Run the match loop, globally or for one symbol.
    Match(MatchOrders),

    /// Snapshot the top of the books, optionally as of a past time.
    Query(QueryBooks),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub id: OrderId,
    pub timestamp: Timestamp,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmendOrder {
    pub id: OrderId,
    pub timestamp: Timestamp,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrder {
    pub id: OrderId,
    pub timestamp: Timestamp,
}

/// `symbol = None` matches every book in ascending symbol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOrders {
    pub timestamp: Timestamp,
    pub symbol: Option<Symbol>,
}

/// `symbol = None` queries every book in ascending symbol order;
/// `timestamp = None` queries current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBooks {
    pub symbol: Option<Symbol>,
    pub timestamp: Option<Timestamp>,
}
