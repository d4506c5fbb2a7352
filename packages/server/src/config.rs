//! Server configuration.

use std::path::PathBuf;

use clap::{Parser, builder::TypedValueParser};

use crate::domain::DEFAULT_HISTORY_CAPACITY;

/// Runtime configuration, from command-line flags or `NIGHTOWL_*` variables
#[derive(Parser, Debug, Clone)]
#[command(name = "nightowl-server")]
#[command(about = "Real-time chat relay with history replay and a CSV message log", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "NIGHTOWL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "NIGHTOWL_PORT", default_value_t = 8000)]
    pub port: u16,

    /// CSV file every accepted message is appended to
    #[arg(long, env = "NIGHTOWL_LOG_PATH", default_value = "message_history.csv")]
    pub log_path: PathBuf,

    /// Number of recent messages kept in memory and replayed to new joiners
    #[arg(
        long,
        env = "NIGHTOWL_HISTORY_CAPACITY",
        default_value_t = DEFAULT_HISTORY_CAPACITY,
        value_parser = clap::value_parser!(u32).range(1..).map(|n| n as usize)
    )]
    pub history_capacity: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` string to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_path: PathBuf::from("message_history.csv"),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}
