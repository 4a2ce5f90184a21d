//! Notification emails.

use std::fmt::Write;

use jiff::tz::TimeZone;
use serde::Serialize;

use crate::domain::{
    orders::records::OrderRecord, products::records::ProductRecord, users::records::UserRecord,
};

/// A composed email, ready to hand to a [`super::mailer::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

fn subject(order: &OrderRecord) -> String {
    format!("Order nr. {}", order.uuid)
}

/// Confirmation sent right after an order is placed.
#[must_use]
pub fn order_placed(user: &UserRecord, order: &OrderRecord) -> Email {
    Email {
        to: user.email.clone(),
        subject: subject(order),
        body: format!(
            "Dear {},\n\nYou have successfully placed an order. Your order id is {}.",
            user.name, order.uuid
        ),
    }
}

/// Reminder sent ahead of delivery, or `None` when the order never asked for one.
#[must_use]
pub fn delivery_reminder(user: &UserRecord, order: &OrderRecord) -> Option<Email> {
    let lead = order.delivery_notification?;

    Some(Email {
        to: user.email.clone(),
        subject: subject(order),
        body: format!(
            "Dear {},\n\nYour order will be delivered in {} hours\nDelivery address is {}.",
            user.name,
            lead.hours(),
            order.delivery_address
        ),
    })
}

/// Weekly list of products on discount, or `None` when nothing is discounted.
///
/// Products without a discount are skipped.
#[must_use]
pub fn weekly_discount_digest(user: &UserRecord, products: &[ProductRecord]) -> Option<Email> {
    let mut lines = String::new();

    for product in products {
        let Some(discount) = product.discount else {
            continue;
        };

        _ = writeln!(
            lines,
            "- {} off {} until {}",
            discount.percent,
            product.name,
            discount.expires_at.to_zoned(TimeZone::UTC).date()
        );
    }

    if lines.is_empty() {
        return None;
    }

    Some(Email {
        to: user.email.clone(),
        subject: format!("Current discounts for {}", user.name),
        body: format!(
            "Dear {},\n\nThese products are on discount this week:\n\n{}",
            user.name,
            lines.trim_end()
        ),
    })
}
