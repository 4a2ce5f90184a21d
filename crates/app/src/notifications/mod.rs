//! Notifications
//!
//! Order placement hands [`Notification`]s to a [`NotificationDispatcher`] after its
//! transaction commits. Dispatching only queues work; the [`worker::NotificationWorker`]
//! composes the emails and delivers them through a [`mailer::Mailer`]. The
//! [`sweep::ReminderSweeper`] re-queues delivery reminders that are due but unsent, and
//! [`digest::WeeklyDigest`] emails subscribers the discounts currently running.

use std::fmt;

use jiff::Timestamp;
use mockall::automock;
use thiserror::Error;

use crate::domain::{orders::records::OrderUuid, users::records::UserUuid};

pub mod digest;
pub mod dispatcher;
pub mod mailer;
pub mod messages;
pub mod retry;
pub mod sweep;
pub mod worker;

pub use digest::WeeklyDigest;
pub use dispatcher::ChannelDispatcher;
pub use sweep::ReminderSweeper;
pub use worker::{Deliverer, NotificationWorker};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Sent as soon as an order is placed.
    OrderPlaced,

    /// Sent ahead of the requested delivery date.
    DeliveryReminder,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderPlaced => "order_placed",
            Self::DeliveryReminder => "delivery_reminder",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub order: OrderUuid,
    pub user: UserUuid,
    /// Earliest instant to deliver at; `None` means immediately.
    pub scheduled_at: Option<Timestamp>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("notification queue is closed")]
    Closed,
}

/// Accepts notifications for asynchronous delivery.
///
/// Implementations must not block: callers dispatch while handling a request.
#[automock]
pub trait NotificationDispatcher: Send + Sync {
    /// Queue a notification.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] when nothing will ever deliver it.
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError>;
}
