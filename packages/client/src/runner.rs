//! Client execution logic with reconnection support.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{reconnects_after, session_url, should_attempt_reconnect},
    error::ClientError,
    session::run_session,
    ui::{Console, Terminal, spawn_line_reader},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// How often and how fast to reconnect
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_reconnects: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_reconnects: MAX_RECONNECT_ATTEMPTS,
            interval: Duration::from_secs(RECONNECT_INTERVAL_SECS),
        }
    }
}

/// Run the terminal client with reconnection logic
pub async fn run_client(config: &ClientConfig) -> Result<(), ClientError> {
    let url = session_url(&config.url, &config.client_id);
    let mut input = spawn_line_reader(&config.client_id);
    let console = Terminal::new(&config.client_id);

    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        config.client_id
    );

    run_with_retry(&url, &mut input, &console, RetryPolicy::default()).await
}

/// Run sessions against `url` until the input closes, reconnecting per `policy`
pub async fn run_with_retry(
    url: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
    console: &dyn Console,
    policy: RetryPolicy,
) -> Result<(), ClientError> {
    let mut reconnects = 0;

    loop {
        tracing::info!("Connecting to {} (reconnect {})", url, reconnects);

        match run_session(url, input, console).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                reconnects = reconnects_after(&e, reconnects);
                if !should_attempt_reconnect(&e, reconnects, policy.max_reconnects) {
                    tracing::error!("Giving up after {} reconnect(s): {}", reconnects, e);
                    return Err(e);
                }

                reconnects += 1;
                tracing::warn!(
                    "{}. Reconnecting in {:?}... ({}/{})",
                    e,
                    policy.interval,
                    reconnects,
                    policy.max_reconnects
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
