//! Order types for the FX order book.
//!
//! ## Identity
//!
//! An [`OrderKey`] names one resting order: who submitted it, for which
//! instrument, on which side, and under which id. Keys are totally ordered
//! so they can index the persistent maps inside a price level.
//!
//! ## Exact Amounts
//!
//! Prices and amounts are `rust_decimal::Decimal`. Nothing in this crate
//! converts them to floating point.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::OrderBookError;
use crate::types::Instrument;

// ============================================================================
// Side enum
// ============================================================================

/// Side of a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// Buy-side resting order
    Bid,
    /// Sell-side resting order
    Ask,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Upper-case label used in `Display` and log fields
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "BID",
            Side::Ask => "ASK",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OrderKey
// ============================================================================

/// Composite identity of a resting order.
///
/// Two orders with equal keys are the same order; adding one while the
/// other rests relocates it instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    /// Identity that submitted the order
    pub originator: Arc<str>,
    /// Instrument the order rests on
    pub instrument: Instrument,
    /// Bid or Ask
    pub side: Side,
    /// Originator-assigned order id
    pub order_id: u64,
}

impl OrderKey {
    pub fn new(
        originator: impl Into<Arc<str>>,
        instrument: Instrument,
        side: Side,
        order_id: u64,
    ) -> Self {
        Self {
            originator: originator.into(),
            instrument,
            side,
            order_id,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.originator, self.instrument, self.side, self.order_id
        )
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// Immutable once built. Replacing an order means adding a new `Order`
/// under the same key.
///
/// ## Example
///
/// ```
/// use fx_orderbook::types::{Instrument, Order, OrderKey, Side};
/// use rust_decimal::Decimal;
///
/// let eurusd = Instrument::new("EUR/USD").unwrap();
/// let key = OrderKey::new("lp-1", eurusd, Side::Bid, 7);
/// let order = Order::new(key, Decimal::new(11000, 4), Decimal::from(1_000_000)).unwrap();
///
/// assert_eq!(order.side(), Side::Bid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order {
    key: OrderKey,
    price: Decimal,
    amount: Decimal,
}

impl Order {
    /// Create an order, validating `price >= 0` and `amount > 0`.
    ///
    /// # Errors
    ///
    /// * [`OrderBookError::InvalidPrice`] for a negative price
    /// * [`OrderBookError::InvalidAmount`] for a zero or negative amount
    pub fn new(key: OrderKey, price: Decimal, amount: Decimal) -> Result<Self, OrderBookError> {
        if price < Decimal::ZERO {
            return Err(OrderBookError::InvalidPrice(price));
        }
        if amount <= Decimal::ZERO {
            return Err(OrderBookError::InvalidAmount(amount));
        }
        Ok(Self { key, price, amount })
    }

    #[inline]
    pub fn key(&self) -> &OrderKey {
        &self.key
    }

    #[inline]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.key.side
    }

    #[inline]
    pub fn instrument(&self) -> &Instrument {
        &self.key.instrument
    }

    /// price × amount, `None` on overflow
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.amount)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eurusd() -> Instrument {
        Instrument::new("EUR/USD").unwrap()
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Bid.to_string(), "BID");
        assert_eq!(Side::Ask.to_string(), "ASK");
    }

    #[test]
    fn test_order_new() {
        let key = OrderKey::new("lp-1", eurusd(), Side::Ask, 42);
        let order = Order::new(key.clone(), dec!(1.1002), dec!(800000)).unwrap();

        assert_eq!(order.key(), &key);
        assert_eq!(order.price(), dec!(1.1002));
        assert_eq!(order.amount(), dec!(800000));
        assert_eq!(order.side(), Side::Ask);
        assert_eq!(order.instrument(), &eurusd());
    }

    #[test]
    fn test_order_zero_price_allowed() {
        let key = OrderKey::new("lp-1", eurusd(), Side::Bid, 1);
        assert!(Order::new(key, Decimal::ZERO, dec!(1)).is_ok());
    }

    #[test]
    fn test_order_rejects_negative_price() {
        let key = OrderKey::new("lp-1", eurusd(), Side::Bid, 1);
        let err = Order::new(key, dec!(-0.0001), dec!(1)).unwrap_err();
        assert!(matches!(err, OrderBookError::InvalidPrice(p) if p == dec!(-0.0001)));
    }

    #[test]
    fn test_order_rejects_non_positive_amount() {
        let key = OrderKey::new("lp-1", eurusd(), Side::Bid, 1);
        assert!(matches!(
            Order::new(key.clone(), dec!(1.1), Decimal::ZERO),
            Err(OrderBookError::InvalidAmount(_))
        ));
        assert!(matches!(
            Order::new(key, dec!(1.1), dec!(-5)),
            Err(OrderBookError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_order_notional() {
        let key = OrderKey::new("lp-1", eurusd(), Side::Bid, 1);
        let order = Order::new(key, dec!(1.1000), dec!(1000000)).unwrap();
        assert_eq!(order.notional(), Some(dec!(1100000)));
    }

    #[test]
    fn test_key_ordering_is_total() {
        let a = OrderKey::new("a", eurusd(), Side::Bid, 2);
        let b = OrderKey::new("a", eurusd(), Side::Bid, 10);
        let c = OrderKey::new("b", eurusd(), Side::Bid, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
