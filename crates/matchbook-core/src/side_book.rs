//! One side (buy or sell) of a symbol's book.
//!
//! A bounded priority queue of active orders under price-time priority,
//! backed by a single array that also retains terminal orders so as-of
//! queries can still see historical fills and cancellations.
//!
//! Layout: `[ active (heapified) | inactive (retained) ]`. The root of
//! the active prefix is the best order for the side. Retiring an order
//! swaps it behind `active_end`; it stays in the array for historical
//! snapshots. An id-to-slot index is maintained through every swap, so
//! amend, cancel, and fill locate their order without scanning.

use std::collections::HashMap;

use thiserror::Error;

use crate::error::RejectReason;
use crate::order::Order;
use crate::price::Price;
use crate::side::Side;
use crate::{OrderId, Quantity, Timestamp};

/// Bound on the number of orders one side will ever hold, active and
/// retained together. Exceeding it is a configuration error, not a
/// runtime-recoverable condition.
pub const DEFAULT_BOOK_CAPACITY: usize = 1 << 16;

/// The side's order array is at capacity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("side book capacity exhausted")]
pub struct CapacityExceeded;

/// Price-time priority: best price for the side first, then earliest
/// arrival, then insertion order.
fn precedes_at(side: Side, a: &Order, b: &Order, at: Option<Timestamp>) -> bool {
    let (pa, pb) = (a.price_at(at), b.price_at(at));
    if pa != pb {
        return match side {
            Side::Buy => pa > pb,
            Side::Sell => pa < pb,
        };
    }
    let (ta, tb) = (a.arrival_timestamp(), b.arrival_timestamp());
    if ta != tb {
        return ta < tb;
    }
    a.seq < b.seq
}

#[derive(Debug)]
pub struct SideBook {
    side: Side,
    capacity: usize,
    /// `[0..active_end)` heapified, `[active_end..)` retained terminal.
    data: Vec<Order>,
    active_end: usize,
    /// Order id -> slot in `data`, for active and retained orders alike.
    slot_of: HashMap<OrderId, usize>,
    next_seq: u64,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        SideBook::with_capacity(side, DEFAULT_BOOK_CAPACITY)
    }

    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        SideBook {
            side,
            capacity,
            data: Vec::new(),
            active_end: 0,
            slot_of: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of orders still participating in matching.
    pub fn active_len(&self) -> usize {
        self.active_end
    }

    /// Number of orders ever inserted and still retained.
    pub fn retained_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_end == 0
    }

    /// Best active order for this side, or `None` if the side is empty.
    pub fn top(&self) -> Option<&Order> {
        (self.active_end > 0).then(|| &self.data[0])
    }

    /// Active order by id.
    pub fn active(&self, id: OrderId) -> Option<&Order> {
        self.active_slot(id).map(|slot| &self.data[slot])
    }

    /// Any retained order by id, active or terminal.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.slot_of.get(&id).map(|&slot| &self.data[slot])
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Order> {
        self.data[..self.active_end].iter()
    }

    pub fn iter_retained(&self) -> impl Iterator<Item = &Order> {
        self.data.iter()
    }

    /// Add an order to the active region and restore the heap.
    ///
    /// The slot at `active_end` may hold a retained terminal order; it
    /// is relocated to the end of the array so the active prefix stays
    /// contiguous.
    pub fn insert(&mut self, mut order: Order) -> Result<(), CapacityExceeded> {
        if self.data.len() >= self.capacity {
            return Err(CapacityExceeded);
        }
        order.seq = self.next_seq;
        self.next_seq += 1;

        let id = order.id();
        let slot = self.active_end;
        if slot == self.data.len() {
            self.data.push(order);
        } else {
            let displaced = std::mem::replace(&mut self.data[slot], order);
            let end = self.data.len();
            self.slot_of.insert(displaced.id(), end);
            self.data.push(displaced);
        }
        self.slot_of.insert(id, slot);
        self.active_end += 1;
        self.sift_up(slot);
        Ok(())
    }

    /// Rewrite price and quantity in place at `at`, then restore heap
    /// order. Time priority is untouched.
    pub fn amend(
        &mut self,
        id: OrderId,
        at: Timestamp,
        new_price: Price,
        new_quantity: Quantity,
    ) -> Result<(), RejectReason> {
        let slot = self.active_slot(id).ok_or(RejectReason::OrderDoesNotExist)?;
        self.data[slot].amend(at, new_price, new_quantity);
        self.restore_at(slot);
        Ok(())
    }

    /// Cancel an active order at `at` and retire it from the heap.
    pub fn cancel(&mut self, id: OrderId, at: Timestamp) -> Result<(), RejectReason> {
        let slot = self.active_slot(id).ok_or(RejectReason::OrderDoesNotExist)?;
        self.data[slot].cancel(at);
        self.retire(slot);
        Ok(())
    }

    /// Deduct `quantity` from an active order, retiring it when fully
    /// filled.
    pub fn apply_fill(
        &mut self,
        id: OrderId,
        quantity: Quantity,
        at: Timestamp,
    ) -> Result<(), RejectReason> {
        let slot = self.active_slot(id).ok_or(RejectReason::OrderDoesNotExist)?;
        let remaining = self.data[slot].quantity_at(None);
        let left = remaining.saturating_sub(quantity);
        self.data[slot].partial_fill(at, left);
        if left == 0 {
            self.retire(slot);
        } else {
            self.restore_at(slot);
        }
        Ok(())
    }

    /// Top `n` orders active as of `at`, best first.
    ///
    /// Scans the whole retained region so historical snapshots see
    /// orders that have since filled or cancelled. Bounded insertion
    /// sort: O(m * n) over m retained orders.
    pub fn top_n_as_of(&self, at: Option<Timestamp>, n: usize) -> Vec<&Order> {
        let mut best: Vec<&Order> = Vec::with_capacity(n + 1);
        for order in &self.data {
            if !order.is_active_at(at) {
                continue;
            }
            let pos = best.partition_point(|o| precedes_at(self.side, o, order, at));
            if pos < n {
                best.insert(pos, order);
                best.truncate(n);
            }
        }
        best
    }

    fn active_slot(&self, id: OrderId) -> Option<usize> {
        self.slot_of
            .get(&id)
            .copied()
            .filter(|&slot| slot < self.active_end)
    }

    /// Swap the order out of the active prefix; it stays retained.
    fn retire(&mut self, slot: usize) {
        let last = self.active_end - 1;
        self.swap_slots(slot, last);
        self.active_end = last;
        if slot < self.active_end {
            self.restore_at(slot);
        }
    }

    /// Re-establish the heap invariant around `slot` after its order
    /// changed. Amendments can move an order in either direction.
    fn restore_at(&mut self, slot: usize) {
        let settled = self.sift_down(slot);
        self.sift_up(settled);
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.data.swap(a, b);
        self.slot_of.insert(self.data[a].id(), a);
        self.slot_of.insert(self.data[b].id(), b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.precedes(slot, parent) {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) -> usize {
        loop {
            let mut best = slot;
            for child in [2 * slot + 1, 2 * slot + 2] {
                if child < self.active_end && self.precedes(child, best) {
                    best = child;
                }
            }
            if best == slot {
                return slot;
            }
            self.swap_slots(slot, best);
            slot = best;
        }
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        precedes_at(self.side, &self.data[a], &self.data[b], None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_type::OrderType;

    fn limit(id: OrderId, ts: Timestamp, cents: u64, qty: Quantity) -> Order {
        Order::new(id, OrderType::Limit, ts, Price::from_hundredths(cents), qty)
    }

    /// Best-by-scan oracle for the heap.
    fn best_by_scan(book: &SideBook) -> Option<OrderId> {
        let mut best: Option<&Order> = None;
        for o in book.iter_active() {
            best = match best {
                Some(b) if precedes_at(book.side(), b, o, None) => Some(b),
                _ => Some(o),
            };
        }
        best.map(Order::id)
    }

    #[test]
    fn top_agrees_with_linear_scan() {
        let mut book = SideBook::new(Side::Buy);
        for (id, ts, cents) in [
            (1, 1, 10010),
            (2, 2, 10400),
            (3, 3, 10100),
            (4, 4, 10400),
            (5, 5, 9900),
            (6, 6, 10900),
            (7, 7, 10050),
        ] {
            book.insert(limit(id, ts, cents, 10)).unwrap();
            assert_eq!(book.top().map(Order::id), best_by_scan(&book));
        }
        assert_eq!(book.top().map(Order::id), Some(6));
    }

    #[test]
    fn sell_side_prefers_lowest_price() {
        let mut book = SideBook::new(Side::Sell);
        book.insert(limit(1, 1, 10553, 100)).unwrap();
        book.insert(limit(2, 2, 10443, 80)).unwrap();
        book.insert(limit(3, 3, 10600, 50)).unwrap();
        assert_eq!(book.top().map(Order::id), Some(2));
    }

    #[test]
    fn equal_prices_resolve_by_arrival() {
        let mut book = SideBook::new(Side::Buy);
        book.insert(limit(9, 5, 10453, 100)).unwrap();
        book.insert(limit(1, 1, 10453, 100)).unwrap();
        book.insert(limit(4, 3, 10453, 100)).unwrap();
        assert_eq!(book.top().map(Order::id), Some(1));
    }

    #[test]
    fn amend_moves_priority_but_keeps_arrival() {
        let mut book = SideBook::new(Side::Sell);
        book.insert(limit(1, 1, 10553, 100)).unwrap();
        book.insert(limit(2, 2, 10443, 80)).unwrap();
        // Amending order 1 below order 2 makes it best.
        book.amend(1, 3, Price::from_hundredths(10442), 100).unwrap();
        assert_eq!(book.top().map(Order::id), Some(1));
        // Amending to the same price as order 2 still wins on arrival.
        book.amend(1, 4, Price::from_hundredths(10443), 100).unwrap();
        assert_eq!(book.top().map(Order::id), Some(1));
        assert_eq!(book.top().map(|o| o.arrival_timestamp()), Some(1));
    }

    #[test]
    fn amend_unknown_or_retired_order_is_missing() {
        let mut book = SideBook::new(Side::Buy);
        book.insert(limit(1, 1, 10000, 10)).unwrap();
        book.cancel(1, 2).unwrap();
        assert_eq!(
            book.amend(1, 3, Price::from_hundredths(10100), 10),
            Err(RejectReason::OrderDoesNotExist)
        );
        assert_eq!(
            book.amend(42, 3, Price::from_hundredths(10100), 10),
            Err(RejectReason::OrderDoesNotExist)
        );
    }

    #[test]
    fn cancel_retires_but_retains_for_history() {
        let mut book = SideBook::new(Side::Buy);
        book.insert(limit(1, 1, 10400, 10)).unwrap();
        book.insert(limit(2, 2, 10500, 10)).unwrap();
        book.cancel(2, 3).unwrap();
        assert_eq!(book.top().map(Order::id), Some(1));
        assert_eq!(book.active_len(), 1);
        assert_eq!(book.retained_len(), 2);
        // Still visible as of a time before the cancel.
        let seen = book.top_n_as_of(Some(2), 5);
        assert_eq!(seen.iter().map(|o| o.id()).collect::<Vec<_>>(), vec![2, 1]);
        let now = book.top_n_as_of(None, 5);
        assert_eq!(now.iter().map(|o| o.id()).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn fills_retire_at_zero_and_reheap_otherwise() {
        let mut book = SideBook::new(Side::Sell);
        book.insert(limit(1, 1, 10443, 80)).unwrap();
        book.insert(limit(2, 2, 10553, 120)).unwrap();
        book.apply_fill(1, 30, 5).unwrap();
        assert_eq!(book.top().map(Order::id), Some(1));
        assert_eq!(book.top().map(|o| o.quantity_at(None)), Some(50));
        book.apply_fill(1, 50, 6).unwrap();
        assert_eq!(book.top().map(Order::id), Some(2));
        assert_eq!(book.active_len(), 1);
        // The filled order is an error to fill again.
        assert!(book.apply_fill(1, 1, 7).is_err());
    }

    #[test]
    fn insert_reuses_slot_vacated_by_retirement() {
        let mut book = SideBook::new(Side::Buy);
        book.insert(limit(1, 1, 10100, 10)).unwrap();
        book.insert(limit(2, 2, 10200, 10)).unwrap();
        book.cancel(1, 3).unwrap();
        book.insert(limit(3, 4, 10300, 10)).unwrap();
        assert_eq!(book.top().map(Order::id), Some(3));
        assert_eq!(book.active_len(), 2);
        assert_eq!(book.retained_len(), 3);
        // The retained cancel is still reachable by id.
        assert!(book.order(1).is_some());
        assert!(book.active(1).is_none());
    }

    #[test]
    fn capacity_is_a_hard_bound() {
        let mut book = SideBook::with_capacity(Side::Buy, 2);
        book.insert(limit(1, 1, 10100, 10)).unwrap();
        book.insert(limit(2, 2, 10200, 10)).unwrap();
        assert!(book.insert(limit(3, 3, 10300, 10)).is_err());
    }

    #[test]
    fn top_n_respects_bound_and_order() {
        let mut book = SideBook::new(Side::Sell);
        for (id, cents) in [(1, 6090), (2, 6290), (3, 6390), (4, 6490), (5, 6590), (6, 6690)] {
            book.insert(limit(id, id, cents, 100)).unwrap();
        }
        let top = book.top_n_as_of(None, 5);
        assert_eq!(top.iter().map(|o| o.id()).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn top_n_as_of_sees_pre_amend_prices() {
        let mut book = SideBook::new(Side::Sell);
        book.insert(limit(1, 1, 10553, 100)).unwrap();
        book.insert(limit(2, 2, 10443, 80)).unwrap();
        book.amend(1, 3, Price::from_hundredths(10400), 100).unwrap();
        let then = book.top_n_as_of(Some(2), 5);
        assert_eq!(then[0].id(), 2);
        assert_eq!(then[0].price_at(Some(2)), Price::from_hundredths(10443));
        assert_eq!(then[1].price_at(Some(2)), Price::from_hundredths(10553));
        let now = book.top_n_as_of(None, 5);
        assert_eq!(now[0].id(), 1);
    }
}
