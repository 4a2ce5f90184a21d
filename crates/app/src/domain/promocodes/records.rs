//! Promocode Records

use jiff::{Timestamp, civil::Date};
use storefront::{percent::Percent, promocodes::Promocode};

use crate::uuids::TypedUuid;

/// Promocode UUID
pub type PromocodeUuid = TypedUuid<PromocodeRecord>;

/// Promocode Record
#[derive(Debug, Clone, PartialEq)]
pub struct PromocodeRecord {
    pub uuid: PromocodeUuid,
    pub name: String,
    pub percent: Percent,
    /// Last calendar day on which the code is accepted.
    pub expires_on: Date,
    pub stackable: bool,
    pub created_at: Timestamp,
}

impl PromocodeRecord {
    #[must_use]
    pub fn to_promocode(&self) -> Promocode {
        Promocode {
            name: self.name.clone(),
            percent: self.percent,
            expires_on: self.expires_on,
            stackable: self.stackable,
        }
    }
}
