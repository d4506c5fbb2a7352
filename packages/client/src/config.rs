//! Client configuration.

use clap::Parser;

/// Command-line arguments of the terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "nightowl-client")]
#[command(about = "Terminal chat client for the NightOwl relay", long_about = None)]
pub struct ClientConfig {
    /// Client ID shown as the sender of your messages
    #[arg(short = 'c', long, value_parser = non_empty)]
    pub client_id: String,

    /// WebSocket endpoint; the client ID is appended as the last path segment
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8000/ws")]
    pub url: String,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("client id must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}
