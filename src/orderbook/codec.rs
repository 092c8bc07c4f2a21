//! Flat delimited text encoding of a book snapshot.
//!
//! ## Format
//!
//! ```text
//! <epochMillis>,<symbol>,BIDS,<price>,<amount>,...,ASKS,<price>,<amount>,...
//! ```
//!
//! One price/amount pair per resting order, each side best-first, so a
//! level holding several orders appears as consecutive pairs.
//!
//! Order identities are not encoded. Decoding gives every order the
//! originator [`DECODED_ORIGINATOR`] and a per-side sequential id starting
//! at 0, then rebuilds the book with `add` at the encoded timestamp.
//!
//! The delimiter is never escaped; [`Instrument`] refuses symbols that
//! contain it.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{CodecError, OrderBookError};
use crate::orderbook::OrderBook;
use crate::types::price::parse_decimal;
use crate::types::{Instrument, Order, OrderKey, Side};

/// Field separator
pub const DELIMITER: char = ',';

/// Marker opening the bid pairs
pub const BIDS_MARKER: &str = "BIDS";

/// Marker opening the ask pairs
pub const ASKS_MARKER: &str = "ASKS";

/// Originator assigned to every decoded order
pub const DECODED_ORIGINATOR: &str = "decoded";

/// Encode `book` in the delimited text format.
pub fn encode(book: &OrderBook) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(4 + 2 * book.len());
    fields.push(book.timestamp().to_string());
    fields.push(book.instrument().symbol().to_string());
    fields.push(BIDS_MARKER.to_string());
    for order in book.orders(Side::Bid) {
        fields.push(order.price().to_string());
        fields.push(order.amount().to_string());
    }
    fields.push(ASKS_MARKER.to_string());
    for order in book.orders(Side::Ask) {
        fields.push(order.price().to_string());
        fields.push(order.amount().to_string());
    }
    let separator = DELIMITER.to_string();
    fields.join(separator.as_str())
}

/// Decode a book from the delimited text format.
///
/// # Errors
///
/// [`OrderBookError::Codec`] for malformed text;
/// [`OrderBookError::InvalidInstrument`], [`OrderBookError::InvalidPrice`]
/// or [`OrderBookError::InvalidAmount`] for well-formed text describing an
/// invalid book.
pub fn decode(text: &str) -> Result<OrderBook, OrderBookError> {
    let mut fields = text.split(DELIMITER);

    let timestamp_field = fields
        .next()
        .filter(|f| !f.is_empty())
        .ok_or(CodecError::MissingField("timestamp"))?;
    let timestamp: u64 = timestamp_field
        .parse()
        .map_err(|_| CodecError::InvalidTimestamp(timestamp_field.to_string()))?;

    let symbol = fields.next().ok_or(CodecError::MissingField("instrument"))?;
    let instrument = Instrument::new(symbol)?;

    let marker = fields.next().ok_or(CodecError::MissingField(BIDS_MARKER))?;
    if marker != BIDS_MARKER {
        return Err(CodecError::MissingMarker {
            expected: BIDS_MARKER,
            found: marker.to_string(),
        }
        .into());
    }

    let mut bids = Vec::new();
    loop {
        let field = fields.next().ok_or(CodecError::MissingField(ASKS_MARKER))?;
        if field == ASKS_MARKER {
            break;
        }
        bids.push(read_pair(field, fields.next())?);
    }

    let mut asks = Vec::new();
    while let Some(field) = fields.next() {
        asks.push(read_pair(field, fields.next())?);
    }

    let book = OrderBook::at_timestamp(instrument.clone(), timestamp);
    let book = rebuild(book, &instrument, Side::Bid, bids, timestamp)?;
    rebuild(book, &instrument, Side::Ask, asks, timestamp)
}

fn read_pair(price: &str, amount: Option<&str>) -> Result<(Decimal, Decimal), CodecError> {
    let amount = amount
        .filter(|a| *a != ASKS_MARKER)
        .ok_or_else(|| CodecError::DanglingPrice(price.to_string()))?;
    Ok((read_decimal(price)?, read_decimal(amount)?))
}

fn read_decimal(field: &str) -> Result<Decimal, CodecError> {
    parse_decimal(field).ok_or_else(|| CodecError::InvalidDecimal(field.to_string()))
}

fn rebuild(
    book: OrderBook,
    instrument: &Instrument,
    side: Side,
    pairs: Vec<(Decimal, Decimal)>,
    timestamp: u64,
) -> Result<OrderBook, OrderBookError> {
    pairs
        .into_iter()
        .enumerate()
        .try_fold(book, |book, (id, (price, amount))| {
            let key = OrderKey::new(DECODED_ORIGINATOR, instrument.clone(), side, id as u64);
            book.add(Order::new(key, price, amount)?, timestamp)
        })
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for OrderBook {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
