//! Reminder Sweep
//!
//! Reminders queued at placement time only live as long as the process that placed the
//! order. The sweeper periodically re-reads orders whose reminder is due but unsent and
//! queues them again, so reminders survive restarts and failed sends. The worker's claim on
//! the sent flag keeps duplicates from reaching the customer.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use thiserror::Error;
use tokio::{sync::oneshot, time::MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{
    domain::orders::{OrdersService, OrdersServiceError},
    notifications::{DispatchError, Notification, NotificationDispatcher, NotificationKind},
};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to load due delivery reminders")]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Re-queues delivery reminders that are due and not yet sent.
#[derive(Clone)]
pub struct ReminderSweeper {
    orders: Arc<dyn OrdersService>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    interval: Duration,
    batch_size: u32,
}

impl ReminderSweeper {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        interval: Duration,
        batch_size: u32,
    ) -> Self {
        Self {
            orders,
            dispatcher,
            interval,
            batch_size: batch_size.max(1),
        }
    }

    /// Queues every reminder due at `now`, up to one batch. Returns how many were queued.
    ///
    /// Due reminders are queued for immediate delivery.
    ///
    /// # Errors
    ///
    /// - [`SweepError::Orders`]: due orders could not be loaded.
    /// - [`SweepError::Dispatch`]: the queue has closed.
    #[tracing::instrument(name = "notifications.sweep", skip(self), err)]
    pub async fn sweep(&self, now: Timestamp) -> Result<usize, SweepError> {
        let due = self
            .orders
            .due_delivery_reminders(now, self.batch_size)
            .await?;

        for order in &due {
            self.dispatcher.dispatch(Notification {
                kind: NotificationKind::DeliveryReminder,
                order: order.uuid,
                user: order.user,
                scheduled_at: None,
            })?;
        }

        if due.is_empty() {
            debug!("no delivery reminders due");
        } else {
            info!(queued = due.len(), "queued due delivery reminders");
        }

        Ok(due.len())
    }

    /// Sweeps on every interval tick until `shutdown` fires or the queue closes.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticks = tokio::time::interval(self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticks.tick() => {
                    match self.sweep(Timestamp::now()).await {
                        Ok(_) | Err(SweepError::Orders(_)) => {}
                        Err(SweepError::Dispatch(error)) => {
                            error!(%error, "notification queue closed, stopping reminder sweep");

                            break;
                        }
                    }
                }
            }
        }

        info!("reminder sweep stopped");
    }
}
