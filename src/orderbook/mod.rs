//! Order book module: persistent price ladders, quoting and encoding.
//!
//! ## Architecture
//!
//! - **Persistent storage**: every structure is an `Arc`-shared AVL tree
//!   ([`pmap`]); updates copy only the path they touch
//! - **Price levels**: orders grouped by exact price, empty levels dropped
//! - **Identity index**: `OrderKey -> Order` for price-independent lookup,
//!   replace and cancel
//!
//! ## Components
//!
//! - [`PriceLevel`]: Orders resting at one price
//! - [`PriceLadder`]: One side's levels in priority order
//! - [`OrderBook`]: Both sides plus the identity index
//! - [`Slice`]: Orders consumed by a book walk
//! - [`codec`]: Delimited text encoding
//! - [`SharedBook`]: Atomically swapped current version
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add / relocate order | O(log n) |
//! | Remove order by key | O(log n) |
//! | Best bid/ask | O(log n) |
//! | Slice / quote | O(log n + k) for k consumed orders |
//! | Clone a version | O(1) |
//!
//! ## Example
//!
//! ```
//! use fx_orderbook::orderbook::OrderBook;
//! use fx_orderbook::types::Side;
//! use rust_decimal::Decimal;
//!
//! let book: OrderBook = "1700000000000,EUR/USD,BIDS,1.1000,1000000,ASKS,1.1002,800000"
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(book.best_ask(), Some(Decimal::new(11002, 4)));
//! assert_eq!(book.spread(), Some(Decimal::new(2, 4)));
//! assert_eq!(book.slice(Side::Ask, Decimal::from(500_000)).unwrap().len(), 1);
//! ```

pub mod pmap;
pub mod level;
pub mod ladder;
pub mod book;
pub mod slice;
pub mod codec;
pub mod shared;

pub use level::PriceLevel;
pub use ladder::{DepthLevel, PriceKey, PriceLadder};
pub use book::OrderBook;
pub use slice::Slice;
pub use shared::SharedBook;
