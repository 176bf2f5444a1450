//! Transports carrying MCP messages to and from the server.

pub mod sse;
pub mod stdio;


pub use sse::SseTransport;

use crate::config::{Config, Transport};
use crate::error::Result;
use crate::mcp::McpServer;
use std::sync::Arc;

/// Run `server` over the selected transport until it exits.
pub async fn run(server: McpServer, transport: Transport, port: u16, config: &Config) -> Result<()> {
    match transport {
        Transport::Stdio => stdio::run(&server).await,
        Transport::Sse => {
            SseTransport::new(Arc::new(server), &config.sse)
                .serve(port)
                .await
        }
    }
}
