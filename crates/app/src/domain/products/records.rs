//! Product Records

use jiff::Timestamp;
use storefront::{catalog::ProductLine, percent::Percent};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Discount UUID
pub type DiscountUuid = TypedUuid<DiscountRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub discount: Option<DiscountRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Product Discount Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRecord {
    pub uuid: DiscountUuid,
    pub percent: Percent,
    pub expires_at: Timestamp,
}

impl ProductRecord {
    /// Snapshot used by the pricing engine.
    #[must_use]
    pub fn to_product_line(&self) -> ProductLine {
        let line = ProductLine::new(self.uuid.into_uuid(), self.price);

        match self.discount {
            Some(discount) => line.with_discount(discount.percent, discount.expires_at),
            None => line,
        }
    }
}
