//! math-server - MCP server with a single addition tool.

use clap::Parser;
use math_server::{logging, transport, Cli, Config, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(&config.log_level);

    tracing::debug!("Starting with transport {} (port {})", cli.transport, cli.port);

    let server = McpServer::new(&config.server);
    transport::run(server, cli.transport, cli.port, &config).await?;

    Ok(())
}
