//! Bid/ask quote derived from an order book snapshot.

use rust_decimal::Decimal;

use crate::types::Instrument;

/// A bid/ask pair for one instrument at one book timestamp.
///
/// Either side may be absent when the book has no (or not enough)
/// liquidity there. Touch quotes come from [`OrderBook::best`], weighted
/// ones from [`OrderBook::quote`].
///
/// [`OrderBook::best`]: crate::orderbook::OrderBook::best
/// [`OrderBook::quote`]: crate::orderbook::OrderBook::quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub instrument: Instrument,
    /// Book timestamp (epoch milliseconds)
    pub timestamp: u64,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
}

impl Quote {
    pub fn new(
        instrument: Instrument,
        timestamp: u64,
        bid: Option<Decimal>,
        ask: Option<Decimal>,
    ) -> Self {
        Self {
            instrument,
            timestamp,
            bid,
            ask,
        }
    }

    /// `ask - bid`, when both sides are present
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask? - self.bid?)
    }

    /// Midpoint of bid and ask, when both sides are present
    pub fn mid(&self) -> Option<Decimal> {
        Some((self.bid? + self.ask?) / Decimal::TWO)
    }

    /// True when both sides are priced
    pub fn is_two_sided(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }
}
