//! Error types for math-server.

use thiserror::Error;

/// Result type alias for math-server.
pub type Result<T> = std::result::Result<T, MathError>;

/// Server error types.
#[derive(Error, Debug)]
pub enum MathError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport setup or runtime error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MathError {
    fn from(e: toml::de::Error) -> Self {
        MathError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for MathError {
    fn from(e: serde_json::Error) -> Self {
        MathError::Serialization(e.to_string())
    }
}

/// Errors raised while executing a tool.
///
/// These are reported back to the client as a tool result with
/// `isError: true`, never as a JSON-RPC error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments failed validation.
    #[error("Invalid arguments for tool {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// Integer result does not fit the host representation.
    #[error("Integer overflow: {a} + {b} does not fit in a 64-bit integer")]
    Overflow { a: i64, b: i64 },
}
