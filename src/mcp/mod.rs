//! MCP (Model Context Protocol) server core.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{McpServer, Reply};
pub use tools::{Tool, ToolDefinition, ToolRegistry};
