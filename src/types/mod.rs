//! Core value types for the FX order book
//!
//! ## Types
//!
//! - [`Instrument`]: Tradable instrument identity
//! - [`Side`]: Bid or Ask
//! - [`OrderKey`]: Composite identity of a resting order
//! - [`Order`]: A resting limit order
//! - [`Quote`]: Bid/ask pair, touch or amount-weighted
//!
//! ## Exact Arithmetic
//!
//! Prices and amounts are `rust_decimal::Decimal`; see [`price`] for the
//! parsing and weighting helpers.

mod instrument;
mod order;
mod quote;
pub mod price;

// Re-export all types at module level
pub use instrument::Instrument;
pub use order::{Order, OrderKey, Side};
pub use quote::Quote;
