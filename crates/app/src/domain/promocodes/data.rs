//! Promocodes Data

use jiff::civil::Date;
use storefront::percent::Percent;

use crate::domain::promocodes::records::PromocodeUuid;

/// New Promocode Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromocode {
    pub uuid: PromocodeUuid,
    pub name: String,
    pub percent: Percent,
    pub expires_on: Date,
    pub stackable: bool,
}
