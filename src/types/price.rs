//! Decimal price and amount utilities.
//!
//! ## Overview
//!
//! All prices and amounts are `rust_decimal::Decimal` so that equality and
//! ordering are exact. The helpers here parse wire text into decimals and
//! compute amount-weighted prices with checked arithmetic.
//!
//! ## Examples
//!
//! ```
//! use fx_orderbook::types::price::{parse_decimal, weighted_average};
//! use rust_decimal::Decimal;
//!
//! let p = parse_decimal("1.1000").unwrap();
//! assert_eq!(p, Decimal::new(11000, 4));
//!
//! let avg = weighted_average([(Decimal::from(2), Decimal::from(1)), (Decimal::from(4), Decimal::from(3))]);
//! assert_eq!(avg, Some(Decimal::new(35, 1)));
//! ```

use rust_decimal::Decimal;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string such as `"1.0999"` or `"500000"`.
///
/// Returns `None` for anything `Decimal` cannot represent exactly,
/// including scientific notation and surrounding whitespace.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() || s.trim() != s || s.contains(['e', 'E']) {
        return None;
    }
    Decimal::from_str_exact(s).ok()
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Amount-weighted average price: `Σ(price × amount) / Σ(amount)`.
///
/// Returns `None` for an empty input, a zero total amount, or on overflow.
pub fn weighted_average<I>(fills: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut notional = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    for (price, amount) in fills {
        notional = notional.checked_add(price.checked_mul(amount)?)?;
        total = total.checked_add(amount)?;
    }
    if total.is_zero() {
        return None;
    }
    notional.checked_div(total)
}

// ============================================================================
// Comparison Helpers
// ============================================================================

/// `true` if |a - b| <= tolerance
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

// ============================================================================
// Unit Tests
// ============================================================================
