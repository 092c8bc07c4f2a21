//! Current-version handle for a book updated by several producers.
//!
//! [`OrderBook`] values never change, so readers need no locking. What
//! concurrent writers need is agreement on which version is current.
//! `SharedBook` holds that version in an `ArcSwap`: readers load it
//! lock-free, writers derive a new version and install it with
//! compare-and-swap, retrying on a lost race.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::error::OrderBookError;
use crate::orderbook::OrderBook;
use crate::types::{Order, OrderKey};

/// Atomically swapped current [`OrderBook`] version.
#[derive(Debug)]
pub struct SharedBook {
    current: ArcSwap<OrderBook>,
}

impl SharedBook {
    pub fn new(book: OrderBook) -> Self {
        Self {
            current: ArcSwap::from_pointee(book),
        }
    }

    /// The current version. Holding it never blocks writers.
    pub fn snapshot(&self) -> Arc<OrderBook> {
        self.current.load_full()
    }

    /// Replace the current version derived from it by `update`.
    ///
    /// `update` may run more than once if another writer installs a version
    /// first. If it fails, nothing is installed and the error is returned.
    pub fn apply<F>(&self, mut update: F) -> Result<Arc<OrderBook>, OrderBookError>
    where
        F: FnMut(&OrderBook) -> Result<OrderBook, OrderBookError>,
    {
        loop {
            let current = self.current.load_full();
            let next = Arc::new(update(&current)?);
            let previous = self.current.compare_and_swap(&current, Arc::clone(&next));
            if Arc::ptr_eq(&*previous, &current) {
                return Ok(next);
            }
            debug!(instrument = %current.instrument(), "book changed concurrently, retrying update");
        }
    }

    /// Add or relocate `order` in the current version.
    pub fn add(&self, order: Order, timestamp: u64) -> Result<Arc<OrderBook>, OrderBookError> {
        self.apply(|book| book.add(order.clone(), timestamp))
    }

    /// Remove `key` from the current version.
    pub fn remove(&self, key: &OrderKey) -> Result<Arc<OrderBook>, OrderBookError> {
        self.apply(|book| book.remove(key))
    }

    /// Install `book` unconditionally, returning the version it replaced.
    pub fn replace(&self, book: OrderBook) -> Arc<OrderBook> {
        self.current.swap(Arc::new(book))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
