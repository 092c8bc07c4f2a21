//! One side of the book: price levels in priority order.
//!
//! ## Price Ordering
//!
//! The ladder is keyed so that in-order iteration is best-first:
//!
//! - **Bids**: `Reverse<Decimal>` keys, highest price first
//! - **Asks**: `Decimal` keys, lowest price first
//!
//! Empty levels are never stored; removing the last order at a price drops
//! the level in the same update.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use tracing::debug;

use crate::orderbook::pmap::PersistentMap;
use crate::orderbook::PriceLevel;
use crate::types::Order;

/// Ladder key that orders prices in a side's priority order.
pub trait PriceKey: Ord + Clone {
    fn from_price(price: Decimal) -> Self;
    fn price(&self) -> Decimal;
}

impl PriceKey for Decimal {
    #[inline]
    fn from_price(price: Decimal) -> Self {
        price
    }

    #[inline]
    fn price(&self) -> Decimal {
        *self
    }
}

impl PriceKey for Reverse<Decimal> {
    #[inline]
    fn from_price(price: Decimal) -> Self {
        Reverse(price)
    }

    #[inline]
    fn price(&self) -> Decimal {
        self.0
    }
}

/// Aggregated view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: Decimal,
    /// Total resting amount at this price
    pub amount: Decimal,
    pub order_count: usize,
}

/// Persistent price-level index for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLadder<K> {
    levels: PersistentMap<K, PriceLevel>,
    order_count: usize,
}

impl<K> Default for PriceLadder<K> {
    fn default() -> Self {
        Self {
            levels: PersistentMap::new(),
            order_count: 0,
        }
    }
}

impl<K: PriceKey> PriceLadder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resting orders on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Number of distinct price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best level on this side
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.first().map(|(_, level)| level)
    }

    /// Best price on this side
    pub fn best_price(&self) -> Option<Decimal> {
        self.levels.first().map(|(key, _)| key.price())
    }

    pub fn level(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&K::from_price(price))
    }

    /// Levels best-first
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels.values()
    }

    /// Every resting order, best price first
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.levels
            .values()
            .flat_map(|level| level.orders().map(|(_, order)| order))
    }

    /// Aggregated depth, best-first, capped at `max_levels` levels
    pub fn depth(&self, max_levels: usize) -> Vec<DepthLevel> {
        self.levels()
            .take(max_levels)
            .map(|level| DepthLevel {
                price: level.price(),
                amount: level.total_amount(),
                order_count: level.order_count(),
            })
            .collect()
    }

    /// New ladder with `order` resting at its price.
    ///
    /// An order under the same key at the same price is replaced; the
    /// caller removes it first when the price changes.
    pub fn insert(&self, order: Order) -> Self {
        let key = K::from_price(order.price());
        let mut order_count = self.order_count;
        let level = match self.levels.get(&key) {
            Some(level) => {
                if level.get(order.key()).is_none() {
                    order_count += 1;
                }
                level.with_order(order)
            }
            None => {
                debug!(price = %order.price(), side = %order.side(), "creating price level");
                order_count += 1;
                PriceLevel::new(order.price()).with_order(order)
            }
        };
        Self {
            levels: self.levels.insert(key, level),
            order_count,
        }
    }

    /// New ladder without `order`, dropping its level if emptied.
    /// `None` if the order does not rest here.
    pub fn remove(&self, order: &Order) -> Option<Self> {
        let key = K::from_price(order.price());
        let (level, _) = self.levels.get(&key)?.without(order.key())?;
        let levels = if level.is_empty() {
            debug!(price = %order.price(), side = %order.side(), "dropping empty price level");
            self.levels.remove(&key)?.0
        } else {
            self.levels.insert(key, level)
        };
        Some(Self {
            levels,
            order_count: self.order_count - 1,
        })
    }

    /// True if both ladders share the same level tree.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.levels.ptr_eq(&other.levels)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
