//! Order state with an append-only alteration history.
//!
//! Every material change to an order (amendment, fill, cancellation)
//! appends an [`AlterationRecord`]. The record in force at a past
//! timestamp answers as-of queries; the last record is the current
//! state. Histories are ordered by timestamp non-decreasing and stop
//! at the first terminal record.

use crate::order_type::OrderType;
use crate::price::Price;
use crate::{OrderId, Quantity, Timestamp};

/// Lifecycle state carried by each history record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    NotExecuted,
    PartiallyExecuted,
    Executed,
    Cancelled,
}

impl ExecutionStatus {
    /// Terminal orders no longer participate in matching.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionStatus::Executed | ExecutionStatus::Cancelled)
    }
}

/// One entry in an order's alteration history.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AlterationRecord {
    pub status: ExecutionStatus,
    pub timestamp: Timestamp,
    pub price: Price,
    pub quantity_remaining: Quantity,
}

/// A single order, buy or sell, with identity and a history tracking
/// every change to itself.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    order_type: OrderType,
    history: Vec<AlterationRecord>,
    /// Book-assigned arrival sequence; final price-time tie-break.
    pub(crate) seq: u64,
}

impl Order {
    pub fn new(
        id: OrderId,
        order_type: OrderType,
        timestamp: Timestamp,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Order {
            id,
            order_type,
            history: vec![AlterationRecord {
                status: ExecutionStatus::NotExecuted,
                timestamp,
                price,
                quantity_remaining: quantity,
            }],
            seq: 0,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// The record in force at `at`; `None` means the latest record.
    ///
    /// If every record is newer than `at` the creation record is
    /// returned; callers that care use [`Order::is_active_at`], which
    /// treats such an order as not yet present.
    pub fn as_of(&self, at: Option<Timestamp>) -> &AlterationRecord {
        self.history
            .iter()
            .rev()
            .find(|r| at.map_or(true, |t| r.timestamp <= t))
            .unwrap_or(&self.history[0])
    }

    /// Timestamp of the creation record. Amendments preserve it, so
    /// this is the order's time priority.
    pub fn arrival_timestamp(&self) -> Timestamp {
        self.history[0].timestamp
    }

    pub fn status_at(&self, at: Option<Timestamp>) -> ExecutionStatus {
        self.as_of(at).status
    }

    pub fn price_at(&self, at: Option<Timestamp>) -> Price {
        self.as_of(at).price
    }

    pub fn quantity_at(&self, at: Option<Timestamp>) -> Quantity {
        self.as_of(at).quantity_remaining
    }

    /// Whether the order had been created and was neither executed nor
    /// cancelled as of `at`.
    pub fn is_active_at(&self, at: Option<Timestamp>) -> bool {
        if let Some(t) = at {
            if self.arrival_timestamp() > t {
                return false;
            }
        }
        !self.as_of(at).status.is_terminal()
    }

    pub fn history(&self) -> &[AlterationRecord] {
        &self.history
    }

    /// Rewrite price and quantity in place. Status carries over
    /// unchanged, and time priority (the arrival timestamp) is
    /// preserved; the record is stamped with the amendment time so
    /// as-of queries can see both states.
    pub fn amend(&mut self, timestamp: Timestamp, new_price: Price, new_quantity: Quantity) {
        let status = self.as_of(None).status;
        self.push_record(AlterationRecord {
            status,
            timestamp,
            price: new_price,
            quantity_remaining: new_quantity,
        });
    }

    /// Record a fill leaving `quantity_remaining` shares; zero marks
    /// the order executed.
    pub fn partial_fill(&mut self, timestamp: Timestamp, quantity_remaining: Quantity) {
        let status = if quantity_remaining == 0 {
            ExecutionStatus::Executed
        } else {
            ExecutionStatus::PartiallyExecuted
        };
        let price = self.price_at(None);
        self.push_record(AlterationRecord {
            status,
            timestamp,
            price,
            quantity_remaining,
        });
    }

    /// Terminal: the order keeps its price and remaining quantity but
    /// leaves the market.
    pub fn cancel(&mut self, timestamp: Timestamp) {
        let current = *self.as_of(None);
        self.push_record(AlterationRecord {
            status: ExecutionStatus::Cancelled,
            timestamp,
            price: current.price,
            quantity_remaining: current.quantity_remaining,
        });
    }

    fn push_record(&mut self, record: AlterationRecord) {
        debug_assert!(
            !self.as_of(None).status.is_terminal(),
            "history must stop at the first terminal record"
        );
        self.history.push(record);
    }
}
