//! Book walking: slices, weighted quotes and depth trimming.
//!
//! ## Slicing Rules
//!
//! - Orders are consumed whole, best price first, never partially
//! - The walk stops as soon as the consumed amount reaches the request
//! - A side too thin to cover the request reports
//!   [`SliceError::BookExhausted`] with everything it could consume
//!
//! The walk is one forward pass over the side's levels with a running
//! total; nothing is rebuilt per consumed order.

use rust_decimal::Decimal;
use tracing::trace;

use crate::error::{OrderBookError, SliceError};
use crate::orderbook::OrderBook;
use crate::types::price::weighted_average;
use crate::types::{Order, Quote, Side};

/// Orders consumed from one side to cover a requested amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    side: Side,
    requested: Decimal,
    filled: Decimal,
    orders: Vec<Order>,
}

impl Slice {
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn requested(&self) -> Decimal {
        self.requested
    }

    /// Sum of consumed order amounts
    #[inline]
    pub fn filled(&self) -> Decimal {
        self.filled
    }

    /// Consumed orders, best price first
    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// True if the consumed amount covers the request
    pub fn is_complete(&self) -> bool {
        self.filled >= self.requested
    }

    /// Amount-weighted average price of the consumed orders
    pub fn weighted_price(&self) -> Option<Decimal> {
        weighted_average(self.orders.iter().map(|o| (o.price(), o.amount())))
    }
}

/// Consume whole orders from `orders` until `amount` is covered.
fn walk<'a, I>(side: Side, orders: I, amount: Decimal) -> Result<Slice, SliceError>
where
    I: Iterator<Item = &'a Order>,
{
    if amount < Decimal::ZERO {
        return Err(SliceError::InvalidAmount(amount));
    }

    let mut filled = Decimal::ZERO;
    let mut consumed = Vec::new();
    for order in orders {
        if filled >= amount {
            break;
        }
        filled = filled.saturating_add(order.amount());
        consumed.push(order.clone());
    }

    let slice = Slice {
        side,
        requested: amount,
        filled,
        orders: consumed,
    };
    trace!(%side, requested = %amount, filled = %filled, orders = slice.len(), "sliced book");

    if slice.is_complete() {
        Ok(slice)
    } else {
        Err(SliceError::BookExhausted {
            side,
            requested: amount,
            partial: slice,
        })
    }
}

impl OrderBook {
    /// Orders consumed from `side`, best price first, to cover `amount`.
    ///
    /// # Errors
    ///
    /// * [`SliceError::InvalidAmount`] for a negative amount
    /// * [`SliceError::BookExhausted`] if the side holds less than
    ///   `amount`; the error carries every order on that side
    ///
    /// # Example
    ///
    /// ```
    /// use fx_orderbook::orderbook::OrderBook;
    /// use fx_orderbook::types::Side;
    /// use rust_decimal::Decimal;
    ///
    /// let book: OrderBook = "1,EUR/USD,BIDS,1.1000,1000000,1.0999,500000,ASKS".parse().unwrap();
    /// let slice = book.slice(Side::Bid, Decimal::from(1_200_000)).unwrap();
    ///
    /// assert_eq!(slice.len(), 2);
    /// assert_eq!(slice.filled(), Decimal::from(1_500_000));
    /// ```
    pub fn slice(&self, side: Side, amount: Decimal) -> Result<Slice, SliceError> {
        walk(side, self.orders(side), amount)
    }

    /// Bid/ask quote weighted over enough depth to cover `amount`.
    ///
    /// A zero amount gives the touch quote ([`OrderBook::best`]). A side that
    /// cannot cover `amount` is quoted as `None`.
    ///
    /// # Errors
    ///
    /// [`OrderBookError::InvalidAmount`] for a negative amount.
    pub fn quote(&self, amount: Decimal) -> Result<Quote, OrderBookError> {
        if amount < Decimal::ZERO {
            return Err(OrderBookError::InvalidAmount(amount));
        }
        if amount.is_zero() {
            return Ok(self.best());
        }

        let side_price = |side| {
            self.slice(side, amount)
                .ok()
                .and_then(|slice| slice.weighted_price())
        };
        Ok(Quote::new(
            self.instrument().clone(),
            self.timestamp(),
            side_price(Side::Bid),
            side_price(Side::Ask),
        ))
    }

    /// New book holding only the orders a `max_amount` slice consumes on
    /// each side. A side thinner than `max_amount` is kept whole.
    ///
    /// # Errors
    ///
    /// [`OrderBookError::InvalidAmount`] for a negative amount.
    pub fn trim(&self, max_amount: Decimal) -> Result<OrderBook, OrderBookError> {
        let kept = |side| match self.slice(side, max_amount) {
            Ok(slice) => Ok(slice.into_orders()),
            Err(SliceError::BookExhausted { partial, .. }) => Ok(partial.into_orders()),
            Err(SliceError::InvalidAmount(amount)) => Err(OrderBookError::InvalidAmount(amount)),
        };
        let bids = kept(Side::Bid)?;
        let asks = kept(Side::Ask)?;

        let timestamp = self.timestamp();
        bids.into_iter().chain(asks).try_fold(
            OrderBook::at_timestamp(self.instrument().clone(), timestamp),
            |book, order| book.add(order, timestamp),
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
