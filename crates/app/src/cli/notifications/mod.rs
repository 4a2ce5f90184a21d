use clap::{Args, Subcommand};

mod digest;
mod run;

#[derive(Debug, Args)]
pub(crate) struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NotificationsSubcommand {
    /// Deliver notifications and sweep for due delivery reminders until interrupted
    Run(run::RunArgs),

    /// Email every subscribed user the products currently on discount
    WeeklyDigest(digest::WeeklyDigestArgs),
}

pub(crate) async fn run(command: NotificationsCommand) -> Result<(), String> {
    match command.command {
        NotificationsSubcommand::Run(args) => run::run(args).await,
        NotificationsSubcommand::WeeklyDigest(args) => digest::run(args).await,
    }
}
