//! User Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub email: String,
    pub name: String,
    /// Loyalty points; only order placement changes this.
    pub cashback_balance: Decimal,
    /// Opted in to the weekly email listing products on discount.
    pub weekly_discount_digest: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
