use clap::{Args, Subcommand};

mod set;

#[derive(Debug, Args)]
pub(crate) struct CashbackPolicyCommand {
    #[command(subcommand)]
    command: CashbackPolicySubcommand,
}

#[derive(Debug, Subcommand)]
enum CashbackPolicySubcommand {
    Set(set::SetPolicyArgs),
    Show(set::ShowPolicyArgs),
}

pub(crate) async fn run(command: CashbackPolicyCommand) -> Result<(), String> {
    match command.command {
        CashbackPolicySubcommand::Set(args) => set::run(args).await,
        CashbackPolicySubcommand::Show(args) => set::show(args).await,
    }
}
