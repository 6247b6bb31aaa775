//! Per-symbol book: paired buy and sell queues, the match loop, and
//! top-five snapshots.

use tracing::trace;

use crate::error::{EngineFatal, RejectReason};
use crate::events::{Event, SnapshotEntry, SnapshotRow, Trade};
use crate::order::Order;
use crate::order_type::OrderType;
use crate::price::Price;
use crate::side::Side;
use crate::side_book::SideBook;
use crate::symbol::Symbol;
use crate::{OrderId, Quantity, Timestamp};

/// Number of ranks a query snapshot displays per side.
pub const SNAPSHOT_DEPTH: usize = 5;

#[derive(Debug)]
pub struct SymbolBook {
    symbol: Symbol,
    buys: SideBook,
    sells: SideBook,
}

impl SymbolBook {
    pub fn new(symbol: Symbol) -> Self {
        SymbolBook {
            buys: SideBook::new(Side::Buy),
            sells: SideBook::new(Side::Sell),
            symbol,
        }
    }

    pub fn with_capacity(symbol: Symbol, capacity: usize) -> Self {
        SymbolBook {
            buys: SideBook::with_capacity(Side::Buy, capacity),
            sells: SideBook::with_capacity(Side::Sell, capacity),
            symbol,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn buys(&self) -> &SideBook {
        &self.buys
    }

    pub fn sells(&self) -> &SideBook {
        &self.sells
    }

    /// Admit a new order on `side`.
    ///
    /// Limit orders rest until a match command. Market and IOC orders
    /// match aggressively on arrival and never rest: the unfilled
    /// remainder is cancelled at the arrival timestamp. Arrival trades
    /// are appended to `events`.
    pub fn admit(
        &mut self,
        order: Order,
        side: Side,
        events: &mut Vec<Event>,
    ) -> Result<(), EngineFatal> {
        let id = order.id();
        let at = order.arrival_timestamp();
        let order_type = order.order_type();

        let inserted = match side {
            Side::Buy => self.buys.insert(order),
            Side::Sell => self.sells.insert(order),
        };
        if inserted.is_err() {
            return Err(EngineFatal::BookFull {
                symbol: self.symbol.clone(),
                side,
            });
        }

        if order_type.is_immediate() {
            self.match_arrival(id, side, order_type == OrderType::Market, at, events);
        }
        Ok(())
    }

    /// Rewrite a resting order's price and quantity; routed by side.
    pub fn amend(
        &mut self,
        side: Side,
        id: OrderId,
        at: Timestamp,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), RejectReason> {
        self.side_mut(side).amend(id, at, price, quantity)
    }

    /// Cancel by id; the command language carries no side, so both
    /// queues are consulted.
    pub fn cancel(&mut self, id: OrderId, at: Timestamp) -> Result<(), RejectReason> {
        self.buys
            .cancel(id, at)
            .or_else(|_| self.sells.cancel(id, at))
    }

    /// Repeatedly cross the best buy against the best sell until no
    /// cross remains. Each iteration fills `min(remaining)` on both
    /// sides, so at least one side retires and the loop terminates.
    pub fn run_match(&mut self, at: Timestamp, events: &mut Vec<Event>) {
        loop {
            let (Some(buy), Some(sell)) = (self.buys.top(), self.sells.top()) else {
                break;
            };
            if buy.price_at(None) < sell.price_at(None) {
                break;
            }
            let trade = Trade::capture(&self.symbol, buy, sell);
            let quantity = trade.buy_quantity.min(trade.sell_quantity);
            let (buy_id, sell_id) = (trade.buy_id, trade.sell_id);
            trace!(symbol = %self.symbol, buy_id, sell_id, quantity, "cross");
            events.push(Event::Trade(trade));
            if self.buys.apply_fill(buy_id, quantity, at).is_err() {
                break;
            }
            if self.sells.apply_fill(sell_id, quantity, at).is_err() {
                break;
            }
        }
    }

    /// Emit up to [`SNAPSHOT_DEPTH`] rows of paired buy / sell state as
    /// of `at`. Rows pair the i-th best buy with the i-th best sell;
    /// the shorter side goes empty.
    pub fn snapshot(&self, at: Option<Timestamp>, events: &mut Vec<Event>) {
        let buys = self.buys.top_n_as_of(at, SNAPSHOT_DEPTH);
        let sells = self.sells.top_n_as_of(at, SNAPSHOT_DEPTH);
        for rank in 0..buys.len().max(sells.len()) {
            events.push(Event::SnapshotRow(SnapshotRow {
                symbol: self.symbol.clone(),
                buy: buys.get(rank).map(|o| SnapshotEntry::of(o, at)),
                sell: sells.get(rank).map(|o| SnapshotEntry::of(o, at)),
            }));
        }
    }

    /// Drive an immediate (market / IOC) order against the opposite
    /// side, then cancel whatever is left of it.
    fn match_arrival(
        &mut self,
        id: OrderId,
        side: Side,
        any_price: bool,
        at: Timestamp,
        events: &mut Vec<Event>,
    ) {
        loop {
            let (own, opposite) = match side {
                Side::Buy => (&self.buys, &self.sells),
                Side::Sell => (&self.sells, &self.buys),
            };
            let Some(aggressor) = own.active(id) else {
                break;
            };
            let Some(resting) = opposite.top() else {
                break;
            };
            let crosses = any_price
                || match side {
                    Side::Buy => aggressor.price_at(None) >= resting.price_at(None),
                    Side::Sell => aggressor.price_at(None) <= resting.price_at(None),
                };
            if !crosses {
                break;
            }
            let (buy, sell) = match side {
                Side::Buy => (aggressor, resting),
                Side::Sell => (resting, aggressor),
            };
            let trade = Trade::capture(&self.symbol, buy, sell);
            let quantity = trade.buy_quantity.min(trade.sell_quantity);
            let (buy_id, sell_id) = (trade.buy_id, trade.sell_id);
            events.push(Event::Trade(trade));
            if self.buys.apply_fill(buy_id, quantity, at).is_err() {
                break;
            }
            if self.sells.apply_fill(sell_id, quantity, at).is_err() {
                break;
            }
        }

        // Immediate orders never rest.
        if self.side(side).active(id).is_some() {
            let _ = self.side_mut(side).cancel(id, at);
        }
    }

    fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }
}
