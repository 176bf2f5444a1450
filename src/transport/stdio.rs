//! Newline-delimited JSON-RPC over stdin/stdout.

use crate::error::Result;
use crate::mcp::McpServer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Run the MCP server over the process stdio until stdin closes.
pub async fn run(server: &McpServer) -> Result<()> {
    tracing::info!("{} listening on stdio", server.name());

    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Read one message per line from `reader` and write replies to `writer`.
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(reply) = server.handle_message(&line).await else {
            continue;
        };

        let mut out = serde_json::to_string(&reply)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
