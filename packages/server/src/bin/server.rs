//! NightOwl chat relay.
//!
//! Broadcasts every message to all connected clients, replays the recent
//! history to new joiners and appends every message to a CSV log.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin nightowl-server
//! cargo run --bin nightowl-server -- --host 0.0.0.0 --port 8000 --log-path chat.csv
//! ```

use clap::Parser;

use nightowl_server::{config::ServerConfig, ui::Server};
use nightowl_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    let server = match Server::from_config(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
