use clap::{Parser, Subcommand};
use storefront_app::{config::LoggingConfig, database::Db};

mod cashback;
mod db;
mod notifications;
mod order;
mod product;
mod promocode;
mod shutdown;
mod user;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    User(user::UserCommand),
    Product(product::ProductCommand),
    Promocode(promocode::PromocodeCommand),
    CashbackPolicy(cashback::CashbackPolicyCommand),
    Order(order::OrderCommand),
    Notifications(notifications::NotificationsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::User(command) => user::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Promocode(command) => promocode::run(command).await,
            Commands::CashbackPolicy(command) => cashback::run(command).await,
            Commands::Order(command) => order::run(command).await,
            Commands::Notifications(command) => notifications::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    storefront_app::database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
