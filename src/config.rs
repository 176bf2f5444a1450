//! Configuration management for math-server.

use crate::error::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the SSE transport.
pub const DEFAULT_PORT: u16 = 8069;

/// Transport used to carry MCP messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// MCP HTTP+SSE transport.
    Sse,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Sse => write!(f, "sse"),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Server identity reported to clients.
    #[serde(default)]
    pub server: ServerConfig,

    /// SSE transport settings.
    #[serde(default)]
    pub sse: SseConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Server identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Optional usage instructions returned from `initialize`.
    #[serde(default)]
    pub instructions: Option<String>,
}

fn default_server_name() -> String {
    "Math Server 🧮".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            instructions: None,
        }
    }
}

/// SSE transport settings. The port comes from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the event stream endpoint.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path clients POST messages to.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Outbound message buffer per session.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Keep-alive comment interval in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_sse_path() -> String {
    "/sse".to_string()
}

fn default_message_path() -> String {
    "/messages/".to_string()
}

fn default_channel_capacity() -> usize {
    32
}

fn default_keep_alive() -> u64 {
    15
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            channel_capacity: default_channel_capacity(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            sse: SseConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| MathError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("math-server").join("config.toml"))
    }

    /// Load configuration from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.sse.channel_capacity == 0 {
            return Err(MathError::Config(
                "sse.channel_capacity must be greater than zero".to_string(),
            ));
        }
        for (key, path) in [
            ("sse.sse_path", &self.sse.sse_path),
            ("sse.message_path", &self.sse.message_path),
        ] {
            if !path.starts_with('/') {
                return Err(MathError::Config(format!(
                    "{} must start with '/': {}",
                    key, path
                )));
            }
            if path.trim_end_matches('/') == "/health" || path == "/" {
                return Err(MathError::Config(format!(
                    "{} conflicts with a reserved route: {}",
                    key, path
                )));
            }
        }
        if self.sse.sse_path.trim_end_matches('/') == self.sse.message_path.trim_end_matches('/') {
            return Err(MathError::Config(
                "sse.sse_path and sse.message_path must differ".to_string(),
            ));
        }
        Ok(())
    }
}
