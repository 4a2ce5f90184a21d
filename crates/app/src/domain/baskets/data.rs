//! Baskets Data

use crate::domain::products::records::ProductUuid;

/// New Basket Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBasketItem {
    pub product: ProductUuid,
    pub quantity: u32,
}

/// Basket Quantity Update Data
///
/// Applied only while the stored quantity still equals `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub expected: u32,
    pub quantity: u32,
}
