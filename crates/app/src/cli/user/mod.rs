use clap::{Args, Subcommand};

mod create;
mod digest;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
    /// Opt a user in to or out of the weekly discount digest
    Digest(digest::DigestArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::Digest(args) => digest::run(args).await,
    }
}
