use clap::Args;
use rust_decimal::Decimal;
use storefront::{cashback::CashbackPolicy, percent::Percent};
use storefront_app::{
    config::DatabaseConfig,
    domain::cashback::{CashbackService, PgCashbackService, records::CashbackPolicyRecord},
};

#[derive(Debug, Args)]
pub(crate) struct SetPolicyArgs {
    /// Share of the price that cashback may cover (0-100)
    #[arg(long)]
    redemption_rate: u8,

    /// Balance a user needs before points can be redeemed
    #[arg(long)]
    minimum_balance_to_redeem: Decimal,

    #[command(flatten)]
    database: DatabaseConfig,
}

#[derive(Debug, Args)]
pub(crate) struct ShowPolicyArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

fn print_policy(record: &CashbackPolicyRecord) {
    println!("redemption_rate: {}", record.policy.redemption_rate);
    println!(
        "minimum_balance_to_redeem: {}",
        record.policy.minimum_balance_to_redeem
    );
    println!("updated_at: {}", record.updated_at);
}

pub(crate) async fn run(args: SetPolicyArgs) -> Result<(), String> {
    let redemption_rate = Percent::new(args.redemption_rate).map_err(|error| error.to_string())?;

    let db = crate::cli::connect(&args.database.database_url).await?;

    let record = PgCashbackService::new(db)
        .set_policy(CashbackPolicy {
            redemption_rate,
            minimum_balance_to_redeem: args.minimum_balance_to_redeem,
        })
        .await
        .map_err(|error| format!("failed to set cashback policy: {error}"))?;

    print_policy(&record);

    Ok(())
}

pub(crate) async fn show(args: ShowPolicyArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database.database_url).await?;

    let policy = PgCashbackService::new(db)
        .get_policy()
        .await
        .map_err(|error| format!("failed to load cashback policy: {error}"))?;

    match policy {
        Some(record) => print_policy(&record),
        None => println!("no cashback policy configured"),
    }

    Ok(())
}
