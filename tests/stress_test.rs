//! Stress tests for the persistent order book.
//!
//! These tests verify:
//! 1. Invariants hold across long random add/replace/remove sequences
//! 2. Old versions are unaffected by later updates
//! 3. Determinism: the same feed produces the same state root
//! 4. Slicing agrees with a straightforward sorted-list computation
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use fx_orderbook::{Instrument, Order, OrderBook, OrderKey, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Number of feed events for the main stress test
const STRESS_EVENT_COUNT: usize = 20_000;

/// Distinct order ids per originator; small so replaces are common
const ID_SPACE: u64 = 400;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn eurusd() -> Instrument {
    Instrument::new("EUR/USD").unwrap()
}

enum FeedEvent {
    Add(Order, u64),
    Remove(OrderKey),
}

/// Generate a deterministic feed. Same seed = same events.
///
/// Bids rest between 1.0900 and 1.1000, asks between 1.1001 and 1.1101, in
/// pip steps so many orders share levels.
fn generate_feed(count: usize, seed: u64) -> Vec<FeedEvent> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let instrument = eurusd();
    let mut events = Vec::with_capacity(count);

    for i in 0..count {
        let side = if rng.gen_bool(0.5) { Side::Bid } else { Side::Ask };
        let originator = ["lp-a", "lp-b", "lp-c"][rng.gen_range(0..3)];
        let key = OrderKey::new(originator, instrument.clone(), side, rng.gen_range(0..ID_SPACE));

        if rng.gen_bool(0.25) {
            events.push(FeedEvent::Remove(key));
            continue;
        }

        let pips: i64 = rng.gen_range(0..=100);
        let price = match side {
            Side::Bid => Decimal::new(11000 - pips, 4),
            Side::Ask => Decimal::new(11001 + pips, 4),
        };
        let amount = Decimal::from(rng.gen_range(1..=50u32) * 100_000);
        let timestamp = 1_700_000_000_000 + i as u64;
        events.push(FeedEvent::Add(Order::new(key, price, amount).unwrap(), timestamp));
    }

    events
}

/// Apply a feed, ignoring removals of keys that are not resting.
fn replay(events: &[FeedEvent]) -> OrderBook {
    events.iter().fold(OrderBook::empty(eurusd()), |book, event| match event {
        FeedEvent::Add(order, ts) => book.add(order.clone(), *ts).unwrap(),
        FeedEvent::Remove(key) => book.remove(key).unwrap_or(book),
    })
}

fn assert_invariants(book: &OrderBook) {
    let mut laddered: Vec<&OrderKey> = book
        .orders(Side::Bid)
        .chain(book.orders(Side::Ask))
        .map(|o| o.key())
        .collect();
    laddered.sort();
    let before_dedup = laddered.len();
    laddered.dedup();
    assert_eq!(before_dedup, laddered.len(), "key rests in two buckets");
    assert_eq!(laddered, book.keys().collect::<Vec<_>>(), "index and ladders disagree");

    let bids: Vec<Decimal> = book.bids().levels().map(|l| l.price()).collect();
    assert!(bids.windows(2).all(|w| w[0] > w[1]), "bids not descending");
    let asks: Vec<Decimal> = book.asks().levels().map(|l| l.price()).collect();
    assert!(asks.windows(2).all(|w| w[0] < w[1]), "asks not ascending");

    for level in book.bids().levels() {
        assert!(!level.is_empty(), "empty bid level retained");
        let sum: Decimal = level.orders().map(|(_, o)| o.amount()).sum();
        assert_eq!(sum, level.total_amount());
    }
    for level in book.asks().levels() {
        assert!(!level.is_empty(), "empty ask level retained");
    }
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn stress_random_feed_keeps_invariants() {
    println!("\n=== STRESS TEST: {} feed events ===\n", STRESS_EVENT_COUNT);

    let events = generate_feed(STRESS_EVENT_COUNT, 42);
    let start = Instant::now();

    let mut book = OrderBook::empty(eurusd());
    let mut rejected_removes = 0usize;
    for (i, event) in events.iter().enumerate() {
        book = match event {
            FeedEvent::Add(order, ts) => book.add(order.clone(), *ts).unwrap(),
            FeedEvent::Remove(key) => match book.remove(key) {
                Ok(next) => next,
                Err(_) => {
                    rejected_removes += 1;
                    book
                }
            },
        };
        if i % 1_000 == 0 {
            assert_invariants(&book);
        }
    }
    assert_invariants(&book);

    println!("  Elapsed time:      {:>12.2?}", start.elapsed());
    println!("  Final book size:   {:>12}", book.len());
    println!("  Bid levels:        {:>12}", book.bid_levels());
    println!("  Ask levels:        {:>12}", book.ask_levels());
    println!("  Rejected removes:  {:>12}", rejected_removes);

    assert!(book.len() > 0);
    assert!(book.len() <= 3 * 2 * ID_SPACE as usize);
    assert!(rejected_removes > 0);
}

#[test]
fn old_versions_are_unaffected() {
    let events = generate_feed(5_000, 7);

    let mut versions = vec![OrderBook::empty(eurusd())];
    let mut encodings = vec![versions[0].to_string()];
    for event in &events {
        let last = versions.last().unwrap();
        let next = match event {
            FeedEvent::Add(order, ts) => last.add(order.clone(), *ts).unwrap(),
            FeedEvent::Remove(key) => last.remove(key).unwrap_or_else(|_| last.clone()),
        };
        encodings.push(next.to_string());
        versions.push(next);
    }

    // Every retained version still reads exactly as it did when produced.
    for (version, encoding) in versions.iter().zip(&encodings).step_by(97) {
        assert_eq!(&version.to_string(), encoding);
        assert_invariants(version);
    }
}

/// Same feed produces identical state root.
#[test]
fn verify_determinism() {
    const SEED: u64 = 12345;

    let root1 = replay(&generate_feed(10_000, SEED)).state_root();
    let root2 = replay(&generate_feed(10_000, SEED)).state_root();
    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "state roots must match for the same feed");

    let root3 = replay(&generate_feed(10_000, SEED + 1)).state_root();
    assert_ne!(root1, root3, "different feeds should produce different roots");
}

/// Slicing matches a sort-then-accumulate reference.
#[test]
fn slice_matches_reference() {
    let book = replay(&generate_feed(8_000, 99));
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for side in [Side::Bid, Side::Ask] {
        let mut reference: Vec<Order> = book.orders(side).cloned().collect();
        reference.sort_by(|a, b| match side {
            Side::Bid => b.price().cmp(&a.price()).then_with(|| a.key().cmp(b.key())),
            Side::Ask => a.price().cmp(&b.price()).then_with(|| a.key().cmp(b.key())),
        });
        let depth: Decimal = reference.iter().map(|o| o.amount()).sum();

        for _ in 0..50 {
            let amount = Decimal::from(rng.gen_range(1..=200u32) * 100_000);
            let mut filled = Decimal::ZERO;
            let expected: Vec<&Order> = reference
                .iter()
                .take_while(|o| {
                    let take = filled < amount;
                    filled += o.amount();
                    take
                })
                .collect();

            match book.slice(side, amount) {
                Ok(slice) => {
                    assert!(amount <= depth);
                    assert_eq!(slice.orders().iter().collect::<Vec<_>>(), expected);
                }
                Err(err) => {
                    assert!(amount > depth);
                    assert_eq!(err.partial().unwrap().len(), reference.len());
                }
            }
        }
    }
}

/// Decoding an encoded book preserves its observable pricing.
#[test]
fn codec_preserves_pricing() {
    let book = replay(&generate_feed(6_000, 11));
    let decoded: OrderBook = book.to_string().parse().unwrap();

    assert_eq!(decoded.timestamp(), book.timestamp());
    assert_eq!(decoded.len(), book.len());
    assert_eq!(decoded.best(), book.best());
    for amount in [1_000_000, 10_000_000, 100_000_000] {
        let amount = Decimal::from(amount);
        assert_eq!(decoded.quote(amount).unwrap(), book.quote(amount).unwrap());
    }
}
