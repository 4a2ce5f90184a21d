//! In-process notification queue.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use super::{DispatchError, Notification, NotificationDispatcher};

/// Dispatcher backed by an unbounded `tokio` channel.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: UnboundedSender<Notification>,
}

impl ChannelDispatcher {
    /// Creates a dispatcher and the receiving end a worker reads from.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = unbounded_channel();

        (Self { sender }, receiver)
    }
}

impl NotificationDispatcher for ChannelDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        self.sender
            .send(notification)
            .map_err(|_closed| DispatchError::Closed)?;

        debug!(
            kind = %notification.kind,
            order_uuid = %notification.order,
            "queued notification"
        );

        Ok(())
    }
}
