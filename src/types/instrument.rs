//! Instrument identity.

use std::fmt;
use std::sync::Arc;

use crate::error::OrderBookError;
use crate::orderbook::codec::DELIMITER;

/// A tradable instrument, identified by its symbol (e.g. `EUR/USD`).
///
/// Cloning is cheap: the symbol is shared behind an `Arc`, and every
/// [`OrderKey`](crate::types::OrderKey) carries a copy.
///
/// Symbols may not be empty and may not contain the text codec's field
/// delimiter, so every book can be encoded and decoded back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instrument {
    symbol: Arc<str>,
}

impl Instrument {
    /// # Errors
    ///
    /// [`OrderBookError::InvalidInstrument`] if `symbol` is empty, has
    /// surrounding whitespace, or contains the codec delimiter.
    pub fn new(symbol: &str) -> Result<Self, OrderBookError> {
        if symbol.is_empty() || symbol.trim() != symbol || symbol.contains(DELIMITER) {
            return Err(OrderBookError::InvalidInstrument(symbol.to_string()));
        }
        Ok(Self {
            symbol: Arc::from(symbol),
        })
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}
