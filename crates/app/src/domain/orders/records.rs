//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        orders::delivery::{
            DeliveryMethod, DeliveryStatus, NotificationLead, PaymentMethod, PaymentStatus,
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Totals are stored as computed at placement and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub items: Vec<OrderItemRecord>,
    /// Amount charged, in whole minor units.
    pub total_price: u64,
    /// Every requested quantity, including products that could not be priced.
    pub total_item_count: u64,
    /// Untruncated amount the charge was derived from.
    pub amount: Decimal,
    /// Name of the promocode that reduced the price.
    pub promocode: Option<String>,
    pub cashback_spent: Decimal,
    pub cashback_earned: Decimal,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub delivery_address: String,
    pub comment: String,
    pub delivery_date: Option<Timestamp>,
    pub delivery_notification: Option<NotificationLead>,
    pub delivery_notification_sent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub product: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub effective_unit_price: Decimal,
    pub discount_applied: bool,
}

impl OrderRecord {
    /// When the delivery reminder is due, if one was requested.
    #[must_use]
    pub fn delivery_reminder_at(&self) -> Option<Timestamp> {
        let lead = self.delivery_notification?;

        self.delivery_date?.checked_sub(lead.duration()).ok()
    }
}
