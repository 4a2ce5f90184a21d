use clap::Args;
use jiff::civil::Date;
use storefront::percent::Percent;
use storefront_app::{
    config::DatabaseConfig,
    domain::promocodes::{
        PgPromocodesService, PromocodesService, data::NewPromocode, records::PromocodeUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreatePromocodeArgs {
    /// Code customers enter at checkout
    #[arg(long)]
    name: String,

    /// Percentage taken off the order (0-100)
    #[arg(long)]
    percent: u8,

    /// Last day the code is accepted, e.g. 2024-12-31
    #[arg(long)]
    expires_on: Date,

    /// Whether the code combines with product discounts
    #[arg(long)]
    stackable: bool,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: CreatePromocodeArgs) -> Result<(), String> {
    let percent = Percent::new(args.percent).map_err(|error| error.to_string())?;

    let db = crate::cli::connect(&args.database.database_url).await?;

    let promocode = PgPromocodesService::new(db)
        .create_promocode(NewPromocode {
            uuid: PromocodeUuid::new(),
            name: args.name,
            percent,
            expires_on: args.expires_on,
            stackable: args.stackable,
        })
        .await
        .map_err(|error| format!("failed to create promocode: {error}"))?;

    println!("promocode: {}", promocode.name);
    println!("percent: {}", promocode.percent);
    println!("expires_on: {}", promocode.expires_on);
    println!("stackable: {}", promocode.stackable);

    Ok(())
}
