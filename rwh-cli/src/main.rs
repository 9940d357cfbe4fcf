//! RWH CLI - Command line tool for rooftop rainwater harvesting estimates.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "rwh-cli",
    version,
    about = "Rooftop rainwater harvesting feasibility toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: rwh_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("rwh-cli {}", env!("CARGO_PKG_VERSION"));
    rwh_cmd::run(cli.command).await
}
