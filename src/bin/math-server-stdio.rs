//! math-server-stdio - the math server fixed to the stdio transport.

use math_server::{logging, transport, Config, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(&config.log_level);

    let server = McpServer::new(&config.server);
    transport::stdio::run(&server).await?;

    Ok(())
}
