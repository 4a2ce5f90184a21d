//! Notification Worker
//!
//! Drains the dispatcher's queue and delivers each notification on its own task. Immediate
//! notifications are composed and sent straight away; scheduled ones sleep until they are
//! due. Failed sends are retried according to a [`RetryPolicy`].
//!
//! The worker stops when its shutdown signal fires or when every dispatcher has been dropped.
//! Either way it first lets immediate deliveries finish and abandons reminders that are not
//! due yet; the reminder sweep queues those again once they fall due.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{
    sync::{mpsc::UnboundedReceiver, oneshot},
    task::JoinSet,
};
use tracing::{debug, error, info, warn};

use crate::{
    domain::{
        orders::{OrdersService, records::OrderRecord},
        users::{UsersService, records::UserRecord},
    },
    notifications::{
        Notification, NotificationKind,
        mailer::{Mailer, send_with_retry},
        messages::{self, Email},
        retry::RetryPolicy,
    },
};

/// Composes and sends a single notification.
#[derive(Clone)]
pub struct Deliverer {
    orders: Arc<dyn OrdersService>,
    users: Arc<dyn UsersService>,
    mailer: Arc<dyn Mailer>,
    retry: RetryPolicy,
}

impl Deliverer {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        users: Arc<dyn UsersService>,
        mailer: Arc<dyn Mailer>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            orders,
            users,
            mailer,
            retry,
        }
    }

    /// Waits until the notification is due, then delivers it. Returns whether an email went
    /// out.
    #[tracing::instrument(
        name = "notifications.worker.deliver",
        skip(self, notification),
        fields(
            kind = %notification.kind,
            order_uuid = %notification.order,
            user_uuid = %notification.user
        )
    )]
    pub async fn deliver(&self, notification: Notification) -> bool {
        if let Some(scheduled_at) = notification.scheduled_at {
            let wait = until(scheduled_at);

            if !wait.is_zero() {
                debug!(%scheduled_at, "waiting until notification is due");

                tokio::time::sleep(wait).await;
            }
        }

        let Some((user, order)) = self.load(notification).await else {
            return false;
        };

        match notification.kind {
            NotificationKind::OrderPlaced => {
                self.send_with_retry(&messages::order_placed(&user, &order))
                    .await
            }
            NotificationKind::DeliveryReminder => self.remind(&user, &order).await,
        }
    }

    /// Claims the reminder before sending so that concurrent deliveries of the same order
    /// send at most once. A failed send releases the claim for a later sweep.
    async fn remind(&self, user: &UserRecord, order: &OrderRecord) -> bool {
        if order.delivery_notification_sent {
            debug!("delivery reminder already sent");

            return false;
        }

        let Some(email) = messages::delivery_reminder(user, order) else {
            debug!("order no longer asks for a delivery reminder");

            return false;
        };

        match self.orders.mark_delivery_notification_sent(order.uuid).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("delivery reminder claimed by another delivery");

                return false;
            }
            Err(error) => {
                error!(%error, "failed to claim delivery reminder");

                return false;
            }
        }

        if self.send_with_retry(&email).await {
            return true;
        }

        if let Err(error) = self.orders.reset_delivery_notification_sent(order.uuid).await {
            error!(%error, "failed to release delivery reminder after a failed send");
        }

        false
    }

    async fn load(&self, notification: Notification) -> Option<(UserRecord, OrderRecord)> {
        let order = match self.orders.get_order(notification.order).await {
            Ok(order) => order,
            Err(error) => {
                error!(%error, "failed to load order for notification");

                return None;
            }
        };

        let user = match self.users.get_user(notification.user).await {
            Ok(user) => user,
            Err(error) => {
                error!(%error, "failed to load user for notification");

                return None;
            }
        };

        Some((user, order))
    }

    async fn send_with_retry(&self, email: &Email) -> bool {
        send_with_retry(self.mailer.as_ref(), &self.retry, email).await
    }
}

/// Time left until `instant`, or zero when it has passed.
fn until(instant: Timestamp) -> Duration {
    Duration::try_from(instant.duration_since(Timestamp::now())).unwrap_or(Duration::ZERO)
}

/// Background consumer of the notification queue.
pub struct NotificationWorker {
    receiver: UnboundedReceiver<Notification>,
    deliverer: Deliverer,
}

impl NotificationWorker {
    #[must_use]
    pub fn new(receiver: UnboundedReceiver<Notification>, deliverer: Deliverer) -> Self {
        Self {
            receiver,
            deliverer,
        }
    }

    /// Runs until `shutdown` fires or the queue closes.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let mut immediate = JoinSet::new();
        let mut scheduled = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("notification worker shutting down");

                    self.receiver.close();

                    while let Some(notification) = self.receiver.recv().await {
                        self.spawn(notification, &mut immediate, &mut scheduled);
                    }

                    break;
                }
                received = self.receiver.recv() => {
                    let Some(notification) = received else {
                        break;
                    };

                    self.spawn(notification, &mut immediate, &mut scheduled);
                }
                Some(joined) = immediate.join_next(), if !immediate.is_empty() => {
                    log_join(joined);
                }
                Some(joined) = scheduled.join_next(), if !scheduled.is_empty() => {
                    log_join(joined);
                }
            }
        }

        while let Some(joined) = immediate.join_next().await {
            log_join(joined);
        }

        if !scheduled.is_empty() {
            warn!(
                pending = scheduled.len(),
                "abandoning delivery reminders that are not due yet"
            );

            scheduled.abort_all();
        }

        info!("notification worker stopped");
    }

    fn spawn(
        &self,
        notification: Notification,
        immediate: &mut JoinSet<bool>,
        scheduled: &mut JoinSet<bool>,
    ) {
        let deliverer = self.deliverer.clone();
        let tasks = if notification.scheduled_at.is_some() {
            scheduled
        } else {
            immediate
        };

        tasks.spawn(async move { deliverer.deliver(notification).await });
    }
}

fn log_join(joined: Result<bool, tokio::task::JoinError>) {
    if let Err(error) = joined {
        if !error.is_cancelled() {
            error!(%error, "notification task panicked");
        }
    }
}
