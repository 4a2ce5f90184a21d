//! Discount Evaluator
//!
//! Decides whether a product line's discount is active at a given instant and what the
//! effective unit price is. Prices stay exact here; truncation happens once, on the grand
//! total.

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::catalog::{LineDiscount, ProductLine};

/// Unit price after evaluating a line's discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectivePrice {
    /// Effective unit price in minor units, possibly fractional.
    pub unit_price: Decimal,

    /// Whether a discount was applied. Cleared for expired discounts.
    pub discount_applied: bool,
}

/// Whether `discount` is still active at `now`.
///
/// A discount expiring exactly at `now` has no remaining duration and counts as expired.
pub fn is_active(discount: &LineDiscount, now: Timestamp) -> bool {
    discount.expires_at > now
}

/// Computes the effective unit price of `line` at `now`.
pub fn effective_price(line: &ProductLine, now: Timestamp) -> EffectivePrice {
    let unit_price = Decimal::from(line.unit_price);

    match line.discount {
        Some(discount) if is_active(&discount, now) => EffectivePrice {
            unit_price: discount.percent.take_off(unit_price),
            discount_applied: true,
        },
        Some(_) | None => EffectivePrice {
            unit_price,
            discount_applied: false,
        },
    }
}
