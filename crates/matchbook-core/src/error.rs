//! Error taxonomy for the engine.
//!
//! Recoverable conditions surface as [`RejectReason`] values carried
//! inside reject events; they never unwind. Capacity exhaustion is
//! fatal and propagates as [`EngineFatal`] out of the engine, where the
//! driver terminates the process.

use thiserror::Error;

use crate::side::Side;
use crate::symbol::Symbol;

/// Why a command was refused. Rendered as `{code} - {message}` in
/// reject reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// An amendment whose new fields are not representable (code 101).
    #[error("Invalid amendment details")]
    InvalidAmendmentDetails,

    /// An out-of-sequence or structurally invalid command (code 303).
    #[error("Invalid order details")]
    InvalidOrderDetails,

    /// An amend or cancel referencing an unknown order or symbol (code 404).
    #[error("Order does not exist")]
    OrderDoesNotExist,
}

impl RejectReason {
    pub fn code(self) -> u16 {
        match self {
            RejectReason::InvalidAmendmentDetails => 101,
            RejectReason::InvalidOrderDetails => 303,
            RejectReason::OrderDoesNotExist => 404,
        }
    }
}

/// Unrecoverable conditions. The engine performs no further work once
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFatal {
    /// A side's order array hit its fixed capacity.
    #[error("{}-side book for {symbol} is at capacity", .side.as_char())]
    BookFull { symbol: Symbol, side: Side },

    /// The symbol directory hit its fixed capacity.
    #[error("symbol directory is at capacity")]
    DirectoryFull,
}
