//! Command-line interface.

use crate::config::{Transport, DEFAULT_PORT};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "math-server")]
#[command(about = "Run the Math Server 🧮")]
#[command(version)]
pub struct Cli {
    /// Transport type
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Port number for SSE transport
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
