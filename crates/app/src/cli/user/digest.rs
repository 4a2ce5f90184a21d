use clap::Args;
use storefront_app::{
    config::DatabaseConfig,
    domain::users::{PgUsersService, UsersService, records::UserUuid},
};

#[derive(Debug, Args)]
pub(crate) struct DigestArgs {
    #[arg(long)]
    user_uuid: UserUuid,

    /// Stop sending the digest instead of starting it
    #[arg(long)]
    unsubscribe: bool,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: DigestArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database.database_url).await?;

    let user = PgUsersService::new(db)
        .set_weekly_discount_digest(args.user_uuid, !args.unsubscribe)
        .await
        .map_err(|error| format!("failed to update digest subscription: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("weekly_discount_digest: {}", user.weekly_discount_digest);

    Ok(())
}
