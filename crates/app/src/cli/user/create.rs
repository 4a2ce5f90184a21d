use clap::Args;
use storefront_app::{
    config::DatabaseConfig,
    domain::users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Email address, unique per user
    #[arg(long)]
    email: String,

    /// Name used in notification emails
    #[arg(long)]
    name: String,

    /// Send this user the weekly email of products on discount
    #[arg(long)]
    weekly_discount_digest: bool,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<UserUuid>,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database.database_url).await?;

    let user = PgUsersService::new(db)
        .create_user(NewUser {
            uuid: args.user_uuid.unwrap_or_default(),
            email: args.email,
            name: args.name,
            weekly_discount_digest: args.weekly_discount_digest,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("weekly_discount_digest: {}", user.weekly_discount_digest);

    Ok(())
}
