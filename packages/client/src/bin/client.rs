//! Terminal chat client.
//!
//! Connects to a NightOwl relay, prints the replayed history and live
//! messages, and sends each line typed on stdin. Reconnects up to 5 times
//! with a 5 second interval when the connection is lost.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin nightowl-client -- --client-id alice
//! cargo run --bin nightowl-client -- -c bob -u ws://127.0.0.1:8000/ws
//! ```

use clap::Parser;

use nightowl_client::{config::ClientConfig, run_client};
use nightowl_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run_client(&config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
