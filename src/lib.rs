//! # FX Order Book
//!
//! Persistent in-memory limit order book for a single foreign-exchange
//! instrument.
//!
//! ## Architecture
//!
//! - **Types**: Core values (Instrument, OrderKey, Order, Quote)
//! - **OrderBook**: Persistent bid/ask ladders with an identity index
//! - **Quoting**: Touch quotes, amount-weighted quotes and depth trimming
//! - **Codec**: Flat delimited text snapshots
//!
//! ## Design Principles
//!
//! 1. **Persistence**: Every update returns a new book; old versions stay
//!    valid and share unchanged structure
//! 2. **No Floating Point**: Prices and amounts are exact decimals
//! 3. **Atomic Updates**: Replacing an order is a single relocation
//! 4. **Synchronous**: No I/O, no locking, no async in the core

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Instrument, Order, OrderKey, Quote
pub mod types;

/// Order book: persistent ladders, slicing, codec
pub mod orderbook;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{CodecError, OrderBookError, SliceError};
pub use orderbook::{DepthLevel, OrderBook, PriceLevel, SharedBook, Slice};
pub use types::{Instrument, Order, OrderKey, Quote, Side};
