use anyhow::Context;
use tforge::kernel::config::load_config;
use tforge_logger::Logger;
use tforge_server::Server;

#[tforge_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    let config_path = std::env::args().nth(1);
    let cfg = load_config(config_path.as_deref()).context("Critical: Configuration is malformed")?;

    Server::builder().config(cfg).build().await?.run().await
}
