//! Orders Data

use jiff::Timestamp;
use storefront::basket::BasketRequest;

use crate::domain::{
    orders::{
        delivery::{DeliveryMethod, NotificationLead, PaymentMethod, PaymentStatus},
        records::OrderUuid,
    },
    users::records::UserUuid,
};

/// Order placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub basket: BasketRequest,
    pub promocode: Option<String>,
    pub redeem_cashback: bool,
    pub delivery: DeliveryDetails,
}

/// Delivery Details Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_address: String,
    pub comment: String,
    pub delivery_date: Option<Timestamp>,
    pub delivery_notification: Option<NotificationLead>,
}

impl Default for DeliveryDetails {
    fn default() -> Self {
        Self {
            delivery_method: DeliveryMethod::Pickup,
            payment_method: PaymentMethod::Card,
            payment_status: PaymentStatus::Waiting,
            delivery_address: String::new(),
            comment: String::new(),
            delivery_date: None,
            delivery_notification: None,
        }
    }
}
