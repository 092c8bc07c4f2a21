//! Orders resting at one exact price.
//!
//! ## Design
//!
//! A `PriceLevel` is a persistent map from [`OrderKey`] to [`Order`] plus a
//! cached total amount. Adding or removing an order yields a new level and
//! leaves the old one intact; the two share every untouched node.
//!
//! Within a level orders are visited in key order, which keeps slicing and
//! encoding deterministic for a given set of resting orders.

use rust_decimal::Decimal;

use crate::orderbook::pmap::{self, PersistentMap};
use crate::types::{Order, OrderKey};

/// All resting orders at a single price on one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price for this level
    price: Decimal,

    /// Orders at this price, keyed by identity
    orders: PersistentMap<OrderKey, Order>,

    /// Sum of resting amounts at this level
    total_amount: Decimal,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: PersistentMap::new(),
            total_amount: Decimal::ZERO,
        }
    }

    #[inline]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[inline]
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Number of orders at this price level
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, key: &OrderKey) -> Option<&Order> {
        self.orders.get(key)
    }

    /// Orders in key order
    pub fn orders(&self) -> pmap::Iter<'_, OrderKey, Order> {
        self.orders.iter()
    }

    /// New level with `order` resting here, replacing any order under the
    /// same key.
    ///
    /// The caller guarantees `order.price()` equals this level's price.
    pub fn with_order(&self, order: Order) -> Self {
        let remaining = match self.orders.get(order.key()) {
            Some(previous) => self.total_amount.saturating_sub(previous.amount()),
            None => self.total_amount,
        };
        let total_amount = remaining.saturating_add(order.amount());
        Self {
            price: self.price,
            orders: self.orders.insert(order.key().clone(), order),
            total_amount,
        }
    }

    /// New level without `key`, plus the removed order. `None` if absent.
    pub fn without(&self, key: &OrderKey) -> Option<(Self, Order)> {
        let (orders, removed) = self.orders.remove(key)?;
        let level = Self {
            price: self.price,
            orders,
            total_amount: self.total_amount.saturating_sub(removed.amount()),
        };
        Some((level, removed))
    }

    /// True if both levels share the same order tree.
    pub fn shares_orders_with(&self, other: &Self) -> bool {
        self.orders.ptr_eq(&other.orders)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
