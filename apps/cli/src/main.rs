#![allow(clippy::print_stdout)]

use clap::Parser;
use tforge_cli::args::Cli;
use tforge_logger::{ConsoleTarget, Logger};

#[tforge_runtime::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .console(ConsoleTarget::Stderr)
        .env_filter(cli.log.clone())
        .init()?;

    println!("{}", tforge_cli::execute(cli).await?);
    Ok(())
}
