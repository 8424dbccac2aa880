mod cmd;
mod core;
mod ledger;
mod tax;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = cmd::Cli::parse();
    cli.command.exec()
}
