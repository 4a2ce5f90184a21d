use clap::Args;
use jiff::Timestamp;
use storefront_app::{
    config::{DatabaseConfig, NotificationConfig},
    context::AppContext,
};

#[derive(Debug, Args)]
pub(crate) struct WeeklyDigestArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    notifications: NotificationConfig,
}

pub(crate) async fn run(args: WeeklyDigestArgs) -> Result<(), String> {
    let (context, _worker) =
        AppContext::from_database_url(&args.database.database_url, &args.notifications)
            .await
            .map_err(|error| format!("failed to initialise application: {error}"))?;

    let report = context
        .weekly_digest
        .send(Timestamp::now())
        .await
        .map_err(|error| format!("failed to send weekly digest: {error}"))?;

    println!("discounted_products: {}", report.discounted_products);
    println!("subscribers: {}", report.subscribers);
    println!("sent: {}", report.sent);
    println!("failed: {}", report.failed);

    Ok(())
}
