//! Money helpers.
//!
//! All amounts are `rust_decimal::Decimal` in the store currency (USD), in
//! whole units rather than cents. Arithmetic stays exact; rounding happens
//! only where an amount is derived from a percentage.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to whole cents, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `$45.00`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = round_money(amount);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}
