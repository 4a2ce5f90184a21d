//! Products Data

use jiff::Timestamp;
use storefront::percent::Percent;

use crate::domain::products::records::{DiscountUuid, ProductUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub discount: Option<NewDiscount>,
}

/// New Product Discount Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDiscount {
    pub uuid: DiscountUuid,
    pub percent: Percent,
    pub expires_at: Timestamp,
}
