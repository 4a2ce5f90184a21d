//! Notifications queued after an order is placed.

use tracing::warn;

use crate::{
    domain::orders::records::OrderRecord,
    notifications::{Notification, NotificationDispatcher, NotificationKind},
};

/// Notifications an order should produce: a confirmation, plus a reminder when one was asked
/// for.
pub(crate) fn order_notifications(order: &OrderRecord) -> Vec<Notification> {
    let mut notifications = vec![Notification {
        kind: NotificationKind::OrderPlaced,
        order: order.uuid,
        user: order.user,
        scheduled_at: None,
    }];

    if let Some(scheduled_at) = order.delivery_reminder_at() {
        notifications.push(Notification {
            kind: NotificationKind::DeliveryReminder,
            order: order.uuid,
            user: order.user,
            scheduled_at: Some(scheduled_at),
        });
    }

    notifications
}

/// Queues an order's notifications. Failures are logged and otherwise ignored.
pub(crate) fn dispatch_order_notifications(
    dispatcher: &dyn NotificationDispatcher,
    order: &OrderRecord,
) {
    for notification in order_notifications(order) {
        if let Err(error) = dispatcher.dispatch(notification) {
            warn!(
                order_uuid = %order.uuid,
                kind = %notification.kind,
                %error,
                "failed to dispatch notification"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            orders::{
                delivery::{
                    DeliveryMethod, DeliveryStatus, NotificationLead, PaymentMethod,
                    PaymentStatus,
                },
                records::OrderUuid,
            },
            users::records::UserUuid,
        },
        notifications::{DispatchError, MockNotificationDispatcher},
    };

    use super::*;

    fn order(delivery_date: Option<Timestamp>, lead: Option<NotificationLead>) -> OrderRecord {
        OrderRecord {
            uuid: OrderUuid::new(),
            user: UserUuid::new(),
            items: Vec::new(),
            total_price: 1600,
            total_item_count: 2,
            amount: Decimal::from(1600),
            promocode: None,
            cashback_spent: Decimal::ZERO,
            cashback_earned: Decimal::ZERO,
            delivery_method: DeliveryMethod::Courier,
            payment_method: PaymentMethod::Card,
            payment_status: PaymentStatus::Waiting,
            delivery_status: DeliveryStatus::InProcess,
            delivery_address: "1 Main St".to_string(),
            comment: String::new(),
            delivery_date,
            delivery_notification: lead,
            delivery_notification_sent: false,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn plain_order_only_gets_a_confirmation() {
        let order = order(None, None);

        let notifications = order_notifications(&order);

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::OrderPlaced);
        assert_eq!(notifications[0].scheduled_at, None);
    }

    #[test]
    fn reminder_is_scheduled_ahead_of_delivery() -> TestResult {
        let delivery_date: Timestamp = "2024-06-02T18:00:00Z".parse()?;
        let order = order(Some(delivery_date), Some(NotificationLead::SixHours));

        let notifications = order_notifications(&order);

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[1].kind, NotificationKind::DeliveryReminder);
        assert_eq!(
            notifications[1].scheduled_at,
            Some(delivery_date.checked_sub(SignedDuration::from_hours(6))?)
        );

        Ok(())
    }

    #[test]
    fn dispatch_failures_do_not_stop_later_notifications() -> TestResult {
        let delivery_date: Timestamp = "2024-06-02T18:00:00Z".parse()?;
        let order = order(Some(delivery_date), Some(NotificationLead::OneHour));
        let expected = order_notifications(&order);

        let mut dispatcher = MockNotificationDispatcher::new();

        dispatcher
            .expect_dispatch()
            .with(eq(expected[0]))
            .times(1)
            .returning(|_| Err(DispatchError::Closed));

        dispatcher
            .expect_dispatch()
            .with(eq(expected[1]))
            .times(1)
            .returning(|_| Ok(()));

        dispatch_order_notifications(&dispatcher, &order);

        Ok(())
    }
}
