use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct PromocodeCommand {
    #[command(subcommand)]
    command: PromocodeSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromocodeSubcommand {
    Create(create::CreatePromocodeArgs),
}

pub(crate) async fn run(command: PromocodeCommand) -> Result<(), String> {
    match command.command {
        PromocodeSubcommand::Create(args) => create::run(args).await,
    }
}
