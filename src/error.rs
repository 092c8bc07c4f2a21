//! Error types for order book operations.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::orderbook::Slice;
use crate::types::{Instrument, OrderKey, Side};

/// Errors returned by order book constructors and mutators.
///
/// Every mutator borrows the book immutably, so a failed call always
/// leaves the caller's book exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderBookError {
    /// Order belongs to a different instrument than the book.
    #[error("instrument mismatch: book is {expected}, order is {actual}")]
    InstrumentMismatch {
        expected: Instrument,
        actual: Instrument,
    },

    /// No resting order has this key.
    #[error("order not found: {0}")]
    OrderNotFound(OrderKey),

    /// A book cannot be built from zero orders without an instrument.
    #[error("cannot build a book from an empty order collection")]
    EmptyInput,

    /// Negative amount passed to a quoting operation, or a non-positive
    /// order amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Negative order price.
    #[error("invalid price: {0}")]
    InvalidPrice(Decimal),

    /// Empty symbol, or one containing the codec delimiter.
    #[error("invalid instrument symbol: {0:?}")]
    InvalidInstrument(String),

    /// Malformed text encoding.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors from [`OrderBook::slice`](crate::orderbook::OrderBook::slice).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// The side holds less than the requested amount. `partial` holds every
    /// order on that side, best first.
    #[error("{side} side exhausted: requested {requested}, available {}", .partial.filled())]
    BookExhausted {
        side: Side,
        requested: Decimal,
        partial: Slice,
    },
}

impl SliceError {
    /// Orders that could be consumed before the side ran out, if any.
    pub fn partial(&self) -> Option<&Slice> {
        match self {
            SliceError::BookExhausted { partial, .. } => Some(partial),
            SliceError::InvalidAmount(_) => None,
        }
    }

    /// Consume the error, keeping the partial slice.
    pub fn into_partial(self) -> Option<Slice> {
        match self {
            SliceError::BookExhausted { partial, .. } => Some(partial),
            SliceError::InvalidAmount(_) => None,
        }
    }
}

/// Errors from decoding the delimited text format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended before a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// `BIDS` or `ASKS` marker not where expected.
    #[error("expected marker {expected}, found {found:?}")]
    MissingMarker {
        expected: &'static str,
        found: String,
    },

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid decimal: {0:?}")]
    InvalidDecimal(String),

    /// A price with no amount after it.
    #[error("price {0:?} has no amount")]
    DanglingPrice(String),
}
