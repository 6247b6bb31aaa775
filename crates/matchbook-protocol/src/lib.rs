//! matchbook-protocol
//!
//! The textual command language for the matcher.
//!
//! This crate is responsible for turning command lines into
//! `matchbook_core::Command` values and engine events back into report
//! lines; the core stays purely logical.
//!
//! - [`line_codec::parse_command`] : one line -> `Command`
//! - [`line_codec::format_event`]  : one `Event` -> one report line

pub mod line_codec;

pub use line_codec::{format_event, parse_command, ParseError};
