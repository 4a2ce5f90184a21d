//! Basket Records

use jiff::Timestamp;
use storefront::basket::{BasketError, BasketRequest};

use crate::domain::{products::records::ProductUuid, users::records::UserUuid};

/// Basket Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketItemRecord {
    pub user: UserUuid,
    pub product: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Turns stored basket items into a pricing request.
///
/// # Errors
///
/// Returns a [`BasketError`] if a stored quantity is not positive.
pub fn basket_request(items: &[BasketItemRecord]) -> Result<BasketRequest, BasketError> {
    BasketRequest::try_from_iter(
        items
            .iter()
            .map(|item| (item.product.into_uuid(), i64::from(item.quantity))),
    )
}
