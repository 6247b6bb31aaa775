//! Command dispatch: the single-threaded front door of the matcher.
//!
//! One command in, zero or more events out. The engine owns the symbol
//! directory, enforces the monotonic-timestamp rule, and turns every
//! recoverable failure into a reject event. Only capacity exhaustion
//! surfaces as an error.

use tracing::debug;

use crate::command::{AmendOrder, CancelOrder, Command, MatchOrders, NewOrder, QueryBooks};
use crate::directory::SymbolDirectory;
use crate::error::{EngineFatal, RejectReason};
use crate::events::Event;
use crate::order::Order;
use crate::Timestamp;

#[derive(Debug, Default)]
pub struct Engine {
    directory: SymbolDirectory,
    last_timestamp: Timestamp,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            directory: SymbolDirectory::new(),
            last_timestamp: 0,
        }
    }

    /// Bound each side of every book at `capacity` orders.
    pub fn with_book_capacity(capacity: usize) -> Self {
        Engine {
            directory: SymbolDirectory::with_book_capacity(capacity),
            last_timestamp: 0,
        }
    }

    /// Largest timestamp of any accepted command so far.
    pub fn last_timestamp(&self) -> Timestamp {
        self.last_timestamp
    }

    pub fn directory(&self) -> &SymbolDirectory {
        &self.directory
    }

    /// Execute one command, producing its event batch in deterministic
    /// order: accept/reject first, then trades in the order they cross,
    /// then snapshot rows in priority order. Global forms iterate
    /// symbols ascending.
    pub fn execute(&mut self, command: Command) -> Result<Vec<Event>, EngineFatal> {
        let mut events = Vec::new();
        match command {
            Command::New(new) => self.execute_new(new, &mut events)?,
            Command::Amend(amend) => self.execute_amend(amend, &mut events),
            Command::Cancel(cancel) => self.execute_cancel(cancel, &mut events),
            Command::Match(matching) => self.execute_match(matching, &mut events),
            Command::Query(query) => self.execute_query(query, &mut events),
        }
        Ok(events)
    }

    fn execute_new(&mut self, new: NewOrder, events: &mut Vec<Event>) -> Result<(), EngineFatal> {
        if new.timestamp < self.last_timestamp || self.directory.knows_order(new.id) {
            events.push(Event::reject(new.id, RejectReason::InvalidOrderDetails));
            return Ok(());
        }
        debug!(id = new.id, symbol = %new.symbol, side = ?new.side, "new order");

        let order = Order::new(new.id, new.order_type, new.timestamp, new.price, new.quantity);
        let book = self.directory.get_or_create(&new.symbol)?;
        events.push(Event::accept(new.id));
        book.admit(order, new.side, events)?;
        self.directory.record(new.id, new.symbol);
        self.last_timestamp = new.timestamp;
        Ok(())
    }

    fn execute_amend(&mut self, amend: AmendOrder, events: &mut Vec<Event>) {
        if amend.timestamp < self.last_timestamp {
            events.push(Event::amend_reject(
                amend.id,
                RejectReason::InvalidOrderDetails,
            ));
            return;
        }
        let Some(book) = self.directory.lookup_mut(&amend.symbol) else {
            events.push(Event::amend_reject(amend.id, RejectReason::OrderDoesNotExist));
            return;
        };
        match book.amend(
            amend.side,
            amend.id,
            amend.timestamp,
            amend.price,
            amend.quantity,
        ) {
            Ok(()) => {
                events.push(Event::amend_accept(amend.id));
                self.last_timestamp = amend.timestamp;
            }
            Err(reason) => events.push(Event::amend_reject(amend.id, reason)),
        }
    }

    fn execute_cancel(&mut self, cancel: CancelOrder, events: &mut Vec<Event>) {
        if cancel.timestamp < self.last_timestamp {
            events.push(Event::cancel_reject(
                cancel.id,
                RejectReason::InvalidOrderDetails,
            ));
            return;
        }
        let Some(symbol) = self.directory.symbol_of(cancel.id).cloned() else {
            events.push(Event::cancel_reject(
                cancel.id,
                RejectReason::OrderDoesNotExist,
            ));
            return;
        };
        let Some(book) = self.directory.lookup_mut(&symbol) else {
            events.push(Event::cancel_reject(
                cancel.id,
                RejectReason::OrderDoesNotExist,
            ));
            return;
        };
        match book.cancel(cancel.id, cancel.timestamp) {
            Ok(()) => {
                events.push(Event::cancel_accept(cancel.id));
                self.last_timestamp = cancel.timestamp;
            }
            Err(reason) => events.push(Event::cancel_reject(cancel.id, reason)),
        }
    }

    fn execute_match(&mut self, matching: MatchOrders, events: &mut Vec<Event>) {
        // An out-of-sequence match is a no-op: there is no order id to
        // reject against, and no side effect is permitted.
        if matching.timestamp < self.last_timestamp {
            debug!(timestamp = matching.timestamp, "ignoring stale match command");
            return;
        }
        match matching.symbol {
            Some(symbol) => {
                if let Some(book) = self.directory.lookup_mut(&symbol) {
                    book.run_match(matching.timestamp, events);
                }
            }
            None => {
                for symbol in self.directory.sorted_symbols().to_vec() {
                    if let Some(book) = self.directory.lookup_mut(&symbol) {
                        book.run_match(matching.timestamp, events);
                    }
                }
            }
        }
        self.last_timestamp = matching.timestamp;
    }

    /// Queries never touch the clock: their timestamp is an as-of view
    /// time, and reading the past is the point.
    fn execute_query(&self, query: QueryBooks, events: &mut Vec<Event>) {
        match query.symbol {
            Some(symbol) => {
                if let Some(book) = self.directory.lookup(&symbol) {
                    book.snapshot(query.timestamp, events);
                }
            }
            None => {
                for book in self.directory.iter_sorted() {
                    book.snapshot(query.timestamp, events);
                }
            }
        }
    }
}
