use std::{sync::Arc, time::Duration};

use clap::Args;
use storefront_app::{
    config::{DatabaseConfig, NotificationConfig},
    context::AppContext,
    notifications::ReminderSweeper,
};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::cli::shutdown;

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// Seconds to wait for in-flight emails after a termination signal
    #[arg(long, default_value_t = 30)]
    drain_timeout_seconds: u64,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    notifications: NotificationConfig,
}

pub(crate) async fn run(args: RunArgs) -> Result<(), String> {
    let (context, worker) =
        AppContext::from_database_url(&args.database.database_url, &args.notifications)
            .await
            .map_err(|error| format!("failed to initialise application: {error}"))?;

    let sweeper = ReminderSweeper::new(
        Arc::clone(&context.orders),
        Arc::clone(&context.dispatcher),
        args.notifications.reminder_sweep_interval(),
        args.notifications.reminder_sweep_batch_size,
    );

    let (stop_worker, worker_signal) = oneshot::channel();
    let (stop_sweeper, sweeper_signal) = oneshot::channel();

    let worker = tokio::spawn(worker.run(worker_signal));
    let sweeper = tokio::spawn(sweeper.run(sweeper_signal));

    info!(
        interval = ?args.notifications.reminder_sweep_interval(),
        "delivering notifications"
    );

    let waited = shutdown::wait().await;

    _ = stop_sweeper.send(());
    _ = sweeper.await;
    _ = stop_worker.send(());

    let drain = Duration::from_secs(args.drain_timeout_seconds);

    if tokio::time::timeout(drain, worker).await.is_err() {
        warn!(?drain, "timed out waiting for notifications to be delivered");
    }

    waited.map_err(|error| error.to_string())
}
