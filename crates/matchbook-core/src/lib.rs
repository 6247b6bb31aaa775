//! matchbook-core
//!
//! Pure matching engine logic:
//! - commands and events (input/output types)
//! - orders with an append-only alteration history
//! - per-side priority queues with retained history for as-of queries
//! - per-symbol books and the match loop
//! - the multi-symbol engine front door

pub mod command;
pub mod directory;
pub mod engine;
pub mod error;
pub mod events;
pub mod order;
pub mod order_type;
pub mod price;
pub mod side;
pub mod side_book;
pub mod symbol;
pub mod symbol_book;

pub use command::{AmendOrder, CancelOrder, Command, MatchOrders, NewOrder, QueryBooks};
pub use directory::SymbolDirectory;
pub use engine::Engine;
pub use error::{EngineFatal, RejectReason};
pub use events::{Event, SnapshotEntry, SnapshotRow, Trade};
pub use order::{AlterationRecord, ExecutionStatus, Order};
pub use order_type::OrderType;
pub use price::Price;
pub use side::Side;
pub use side_book::{SideBook, DEFAULT_BOOK_CAPACITY};
pub use symbol::Symbol;
pub use symbol_book::{SymbolBook, SNAPSHOT_DEPTH};

/// Engine-lifetime-unique order identifier.
pub type OrderId = u64;

/// Unsigned share quantity; zero means fully filled.
pub type Quantity = u64;

/// Command-stream timestamp, monotonically non-decreasing.
pub type Timestamp = u64;
