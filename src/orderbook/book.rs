//! Persistent order book for a single instrument.
//!
//! ## Architecture
//!
//! - **Bids**: [`PriceLadder`] keyed by `Reverse<Decimal>` (highest first)
//! - **Asks**: [`PriceLadder`] keyed by `Decimal` (lowest first)
//! - **Index**: persistent map `OrderKey -> Order` spanning both sides
//!
//! Every mutator borrows `&self` and returns a new `OrderBook`. The
//! previous version stays valid and shares all untouched structure with
//! the new one, so readers can hold any version without locking.
//!
//! ## Example
//!
//! ```
//! use fx_orderbook::orderbook::OrderBook;
//! use fx_orderbook::types::{Instrument, Order, OrderKey, Side};
//! use rust_decimal::Decimal;
//!
//! let eurusd = Instrument::new("EUR/USD").unwrap();
//! let bid = Order::new(
//!     OrderKey::new("lp-1", eurusd.clone(), Side::Bid, 1),
//!     Decimal::new(11000, 4),
//!     Decimal::from(1_000_000),
//! ).unwrap();
//!
//! let empty = OrderBook::empty(eurusd);
//! let book = empty.add(bid, 1_700_000_000_000).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(Decimal::new(11000, 4)));
//! assert!(empty.is_empty());
//! ```

use std::cmp::Reverse;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::OrderBookError;
use crate::orderbook::pmap::PersistentMap;
use crate::orderbook::{codec, DepthLevel, PriceLadder};
use crate::types::{Instrument, Order, OrderKey, Quote, Side};

/// Immutable snapshot of one instrument's resting orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    instrument: Instrument,

    /// Last effective update time (epoch milliseconds)
    timestamp: u64,

    /// Bid price levels (sorted high to low)
    bids: PriceLadder<Reverse<Decimal>>,

    /// Ask price levels (sorted low to high)
    asks: PriceLadder<Decimal>,

    /// Every resting order by key, both sides
    by_key: PersistentMap<OrderKey, Order>,
}

impl OrderBook {
    /// Empty book with a zero timestamp
    pub fn empty(instrument: Instrument) -> Self {
        Self::at_timestamp(instrument, 0)
    }

    pub(crate) fn at_timestamp(instrument: Instrument, timestamp: u64) -> Self {
        Self {
            instrument,
            timestamp,
            bids: PriceLadder::new(),
            asks: PriceLadder::new(),
            by_key: PersistentMap::new(),
        }
    }

    /// Build a book from timestamped orders, applied in iteration order.
    ///
    /// The first order fixes the instrument.
    ///
    /// # Errors
    ///
    /// * [`OrderBookError::EmptyInput`] if there are no orders
    /// * [`OrderBookError::InstrumentMismatch`] if orders disagree on instrument
    pub fn from_orders<I>(orders: I) -> Result<Self, OrderBookError>
    where
        I: IntoIterator<Item = (Order, u64)>,
    {
        let mut orders = orders.into_iter();
        let (first, timestamp) = orders.next().ok_or(OrderBookError::EmptyInput)?;
        let book = Self::empty(first.instrument().clone()).add(first, timestamp)?;
        orders.try_fold(book, |book, (order, timestamp)| book.add(order, timestamp))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Last effective update time (epoch milliseconds)
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Total number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    pub fn bids(&self) -> &PriceLadder<Reverse<Decimal>> {
        &self.bids
    }

    pub fn asks(&self) -> &PriceLadder<Decimal> {
        &self.asks
    }

    pub fn get(&self, key: &OrderKey) -> Option<&Order> {
        self.by_key.get(key)
    }

    pub fn contains(&self, key: &OrderKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Resting orders on `side`, best price first
    pub fn orders(&self, side: Side) -> Box<dyn Iterator<Item = &Order> + '_> {
        match side {
            Side::Bid => Box::new(self.bids.orders()),
            Side::Ask => Box::new(self.asks.orders()),
        }
    }

    /// Keys of every resting order, in key order
    pub fn keys(&self) -> impl Iterator<Item = &OrderKey> + '_ {
        self.by_key.keys()
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Add `order`, or relocate it if its key already rests in the book.
    ///
    /// The new timestamp is the later of the book's and `timestamp`.
    ///
    /// # Errors
    ///
    /// [`OrderBookError::InstrumentMismatch`] if the order is for another
    /// instrument. `self` is never modified.
    pub fn add(&self, order: Order, timestamp: u64) -> Result<Self, OrderBookError> {
        if order.instrument() != &self.instrument {
            warn!(
                book = %self.instrument,
                order = %order.instrument(),
                "rejecting order for another instrument"
            );
            return Err(OrderBookError::InstrumentMismatch {
                expected: self.instrument.clone(),
                actual: order.instrument().clone(),
            });
        }

        let (mut bids, mut asks) = (self.bids.clone(), self.asks.clone());

        if let Some(previous) = self.by_key.get(order.key()) {
            debug!(
                key = %order.key(),
                from = %previous.price(),
                to = %order.price(),
                "relocating order"
            );
            let missing = || OrderBookError::OrderNotFound(previous.key().clone());
            match previous.side() {
                Side::Bid => bids = bids.remove(previous).ok_or_else(missing)?,
                Side::Ask => asks = asks.remove(previous).ok_or_else(missing)?,
            }
        }

        match order.side() {
            Side::Bid => bids = bids.insert(order.clone()),
            Side::Ask => asks = asks.insert(order.clone()),
        }

        Ok(Self {
            instrument: self.instrument.clone(),
            timestamp: self.timestamp.max(timestamp),
            bids,
            asks,
            by_key: self.by_key.insert(order.key().clone(), order),
        })
    }

    /// Remove the order under `key`. The timestamp is unchanged.
    ///
    /// # Errors
    ///
    /// [`OrderBookError::OrderNotFound`] if no order rests under `key`.
    pub fn remove(&self, key: &OrderKey) -> Result<Self, OrderBookError> {
        let Some((by_key, order)) = self.by_key.remove(key) else {
            warn!(%key, "cannot remove unknown order");
            return Err(OrderBookError::OrderNotFound(key.clone()));
        };

        let missing = || OrderBookError::OrderNotFound(key.clone());
        let (bids, asks) = match order.side() {
            Side::Bid => (self.bids.remove(&order).ok_or_else(missing)?, self.asks.clone()),
            Side::Ask => (self.bids.clone(), self.asks.remove(&order).ok_or_else(missing)?),
        };

        Ok(Self {
            instrument: self.instrument.clone(),
            timestamp: self.timestamp,
            bids,
            asks,
            by_key,
        })
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest bid price, or None if no bids exist
    #[inline]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    /// Lowest ask price, or None if no asks exist
    #[inline]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// Touch quote: best bid and ask, no size weighting
    pub fn best(&self) -> Quote {
        Quote::new(
            self.instrument.clone(),
            self.timestamp,
            self.best_bid(),
            self.best_ask(),
        )
    }

    /// `best_ask - best_bid`, None unless both sides exist
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Aggregated depth on `side`, best-first, at most `max_levels` levels
    pub fn depth(&self, side: Side, max_levels: usize) -> Vec<DepthLevel> {
        match side {
            Side::Bid => self.bids.depth(max_levels),
            Side::Ask => self.asks.depth(max_levels),
        }
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the text encoding followed by every resting key,
    /// best-first per side. Equal books yield equal roots.
    ///
    /// Variable-length fields are hashed with a big-endian `u64` length
    /// prefix; side and order id are fixed width.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hash_field(&mut hasher, codec::encode(self).as_bytes());
        for order in self.bids.orders().chain(self.asks.orders()) {
            let key = order.key();
            hash_field(&mut hasher, key.originator.as_bytes());
            hash_field(&mut hasher, key.instrument.symbol().as_bytes());
            hasher.update([key.side as u8]);
            hasher.update(key.order_id.to_be_bytes());
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

// ============================================================================
// Unit Tests
// ============================================================================
