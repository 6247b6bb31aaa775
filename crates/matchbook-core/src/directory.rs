//! Symbol directory: routes commands to per-symbol books, keeps the
//! symbol set sorted for deterministic global iteration, and remembers
//! where every admitted order lives for cancel-by-id.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::EngineFatal;
use crate::side_book::DEFAULT_BOOK_CAPACITY;
use crate::symbol::Symbol;
use crate::symbol_book::SymbolBook;
use crate::OrderId;

/// Bound on the number of distinct symbols.
pub const MAX_SYMBOLS: usize = 1 << 16;

#[derive(Debug)]
pub struct SymbolDirectory {
    books: HashMap<Symbol, SymbolBook>,
    /// Ascending symbol names, kept in step with `books`.
    sorted_symbols: Vec<Symbol>,
    /// Where each admitted order lives.
    order_to_symbol: HashMap<OrderId, Symbol>,
    book_capacity: usize,
}

impl Default for SymbolDirectory {
    fn default() -> Self {
        SymbolDirectory::new()
    }
}

impl SymbolDirectory {
    pub fn new() -> Self {
        SymbolDirectory::with_book_capacity(DEFAULT_BOOK_CAPACITY)
    }

    /// Use `capacity` for each side of every book created later.
    pub fn with_book_capacity(capacity: usize) -> Self {
        SymbolDirectory {
            books: HashMap::new(),
            sorted_symbols: Vec::new(),
            order_to_symbol: HashMap::new(),
            book_capacity: capacity,
        }
    }

    /// The book for `symbol`, created on first use.
    pub fn get_or_create(&mut self, symbol: &Symbol) -> Result<&mut SymbolBook, EngineFatal> {
        match self.books.entry(symbol.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                if self.sorted_symbols.len() >= MAX_SYMBOLS {
                    return Err(EngineFatal::DirectoryFull);
                }
                if let Err(pos) = self.sorted_symbols.binary_search(symbol) {
                    self.sorted_symbols.insert(pos, symbol.clone());
                }
                Ok(entry.insert(SymbolBook::with_capacity(
                    symbol.clone(),
                    self.book_capacity,
                )))
            }
        }
    }

    pub fn lookup(&self, symbol: &Symbol) -> Option<&SymbolBook> {
        self.books.get(symbol)
    }

    pub fn lookup_mut(&mut self, symbol: &Symbol) -> Option<&mut SymbolBook> {
        self.books.get_mut(symbol)
    }

    /// The symbol where `id` was admitted, if any.
    pub fn symbol_of(&self, id: OrderId) -> Option<&Symbol> {
        self.order_to_symbol.get(&id)
    }

    /// Remember where a newly accepted order lives.
    pub fn record(&mut self, id: OrderId, symbol: Symbol) {
        self.order_to_symbol.insert(id, symbol);
    }

    /// Whether `id` was ever admitted.
    pub fn knows_order(&self, id: OrderId) -> bool {
        self.order_to_symbol.contains_key(&id)
    }

    /// Symbol names in ascending order.
    pub fn sorted_symbols(&self) -> &[Symbol] {
        &self.sorted_symbols
    }

    /// Books in ascending symbol order; finite and restartable.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &SymbolBook> {
        self.sorted_symbols
            .iter()
            .filter_map(move |s| self.books.get(s))
    }
}
