//! Events emitted by the engine, consumed by the report writer.
//!
//! All events are produced in deterministic order within a command:
//! accept/reject first, then trades in the order they cross, then
//! snapshot rows in priority order. The report writer renders them;
//! this module is purely logical.

use crate::error::RejectReason;
use crate::order::Order;
use crate::order_type::OrderType;
use crate::price::Price;
use crate::symbol::Symbol;
use crate::{OrderId, Quantity, Timestamp};

/// An outcome event for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Accept { id: OrderId },
    Reject { id: OrderId, reason: RejectReason },
    AmendAccept { id: OrderId },
    AmendReject { id: OrderId, reason: RejectReason },
    CancelAccept { id: OrderId },
    CancelReject { id: OrderId, reason: RejectReason },
    Trade(Trade),
    SnapshotRow(SnapshotRow),
}

/// A fill between the best buy and the best sell of one symbol.
///
/// Quantities and prices are those in force immediately *before* the
/// fill is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub symbol: Symbol,
    pub buy_id: OrderId,
    pub buy_type: OrderType,
    pub buy_quantity: Quantity,
    pub buy_price: Price,
    pub sell_price: Price,
    pub sell_quantity: Quantity,
    pub sell_type: OrderType,
    pub sell_id: OrderId,
}

impl Trade {
    /// Capture both sides of a cross before either is filled.
    pub fn capture(symbol: &Symbol, buy: &Order, sell: &Order) -> Self {
        Trade {
            symbol: symbol.clone(),
            buy_id: buy.id(),
            buy_type: buy.order_type(),
            buy_quantity: buy.quantity_at(None),
            buy_price: buy.price_at(None),
            sell_price: sell.price_at(None),
            sell_quantity: sell.quantity_at(None),
            sell_type: sell.order_type(),
            sell_id: sell.id(),
        }
    }
}

/// One rank of a top-of-book snapshot. Either side may be absent when
/// the books are uneven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub symbol: Symbol,
    pub buy: Option<SnapshotEntry>,
    pub sell: Option<SnapshotEntry>,
}

/// One order's visible state within a snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: OrderId,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Price,
}

impl SnapshotEntry {
    /// The order's state as of `at`.
    pub fn of(order: &Order, at: Option<Timestamp>) -> Self {
        SnapshotEntry {
            id: order.id(),
            order_type: order.order_type(),
            quantity: order.quantity_at(at),
            price: order.price_at(at),
        }
    }
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl Event {
    pub fn accept(id: OrderId) -> Self {
        Event::Accept { id }
    }

    pub fn reject(id: OrderId, reason: RejectReason) -> Self {
        Event::Reject { id, reason }
    }

    pub fn amend_accept(id: OrderId) -> Self {
        Event::AmendAccept { id }
    }

    pub fn amend_reject(id: OrderId, reason: RejectReason) -> Self {
        Event::AmendReject { id, reason }
    }

    pub fn cancel_accept(id: OrderId) -> Self {
        Event::CancelAccept { id }
    }

    pub fn cancel_reject(id: OrderId, reason: RejectReason) -> Self {
        Event::CancelReject { id, reason }
    }
}
