//! # math-server
//!
//! A minimal MCP (Model Context Protocol) server exposing a single `add` tool.
//!
//! ## Features
//!
//! - `add` tool: returns the sum of two integers
//! - stdio transport (newline-delimited JSON-RPC 2.0)
//! - HTTP+SSE transport for network clients
//!
//! ## Usage
//!
//! ```bash
//! # Serve over stdio (default)
//! math-server
//!
//! # Serve over SSE on port 9000
//! math-server --transport sse --port 9000
//!
//! # stdio-only entry point
//! math-server-stdio
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod math;
pub mod mcp;
pub mod transport;

pub use cli::Cli;
pub use config::{Config, Transport};
pub use error::{MathError, Result, ToolError};
pub use math::add;
pub use mcp::McpServer;
