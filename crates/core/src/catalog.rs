//! Catalog snapshots
//!
//! Pricing never reads live catalog records. Callers resolve the requested products into
//! [`ProductLine`] snapshots at a point in time and hand those to the engine.

use jiff::Timestamp;
use uuid::Uuid;

use crate::percent::Percent;

/// A per-product discount attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDiscount {
    /// Percentage taken off the unit price while the discount is active.
    pub percent: Percent,

    /// Instant from which the discount no longer applies.
    pub expires_at: Timestamp,
}

/// Immutable snapshot of a product's price and discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLine {
    /// Product identifier.
    pub product: Uuid,

    /// Unit price in minor currency units.
    pub unit_price: u64,

    /// Attached discount, if any.
    pub discount: Option<LineDiscount>,
}

impl ProductLine {
    /// Creates a snapshot without a discount.
    pub fn new(product: Uuid, unit_price: u64) -> Self {
        Self {
            product,
            unit_price,
            discount: None,
        }
    }

    /// Attaches a discount to the snapshot.
    #[must_use]
    pub fn with_discount(mut self, percent: Percent, expires_at: Timestamp) -> Self {
        self.discount = Some(LineDiscount {
            percent,
            expires_at,
        });

        self
    }
}
