//! FX Order Book - Demo Binary
//!
//! Builds a small EUR/USD book and logs its snapshot, touch quote and a
//! weighted quote. Log verbosity follows `RUST_LOG` (default `info`).

use fx_orderbook::{Instrument, Order, OrderBook, OrderBookError, OrderKey, Side};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), OrderBookError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let eurusd = Instrument::new("EUR/USD")?;
    let now: u64 = 1_700_000_000_000;

    let levels = [
        (Side::Bid, 1, Decimal::new(11000, 4), 1_000_000),
        (Side::Bid, 2, Decimal::new(10999, 4), 500_000),
        (Side::Ask, 3, Decimal::new(11002, 4), 800_000),
        (Side::Ask, 4, Decimal::new(11003, 4), 2_000_000),
    ];

    let mut book = OrderBook::empty(eurusd.clone());
    for (side, id, price, amount) in levels {
        let order = Order::new(
            OrderKey::new("demo-lp", eurusd.clone(), side, id),
            price,
            Decimal::from(amount),
        )?;
        book = book.add(order, now)?;
    }

    info!(snapshot = %book, "book built");
    info!(state_root = %book.state_root_hex(), orders = book.len(), "state root");

    let touch = book.best();
    info!(bid = ?touch.bid, ask = ?touch.ask, spread = ?touch.spread(), "touch quote");

    let amount = Decimal::from(1_200_000);
    let weighted = book.quote(amount)?;
    info!(%amount, bid = ?weighted.bid, ask = ?weighted.ask, "weighted quote");

    match book.slice(Side::Ask, Decimal::from(5_000_000)) {
        Ok(slice) => info!(orders = slice.len(), filled = %slice.filled(), "ask slice"),
        Err(err) => warn!(%err, "ask slice incomplete"),
    }

    let trimmed = book.trim(Decimal::from(1_000_000))?;
    info!(snapshot = %trimmed, "trimmed to 1,000,000 per side");

    Ok(())
}
