//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use nightowl_server::infrastructure::dto::websocket::ChatMessageDto;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::ClientError;

/// A text frame received from the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A chat message, live or replayed from history
    Chat(ChatMessageDto),
    /// A plain-text announcement, shown verbatim
    System(String),
}

/// Classify a text frame. Anything that is not a chat message JSON object
/// is a system announcement.
pub fn parse_frame(text: &str) -> Incoming {
    match serde_json::from_str::<ChatMessageDto>(text) {
        Ok(message) => Incoming::Chat(message),
        Err(_) => Incoming::System(text.to_string()),
    }
}

/// WebSocket URL for a client id, e.g. `ws://127.0.0.1:8000/ws/alice`.
///
/// The client id is percent-encoded as a single path segment.
pub fn session_url(base_url: &str, client_id: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(client_id, NON_ALPHANUMERIC)
    )
}

/// The line to send for a line of input, or `None` for blank input.
///
/// Non-blank lines are sent exactly as typed.
pub fn outgoing_line(line: &str) -> Option<&str> {
    if line.trim().is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected handshake is never retried.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `reconnects` - Reconnections already attempted in a row
/// * `max_reconnects` - The maximum number of reconnections allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    reconnects: u32,
    max_reconnects: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    reconnects < max_reconnects
}

/// Reconnection count to carry forward after `error`.
///
/// Losing a connection that had been established starts a fresh series.
pub fn reconnects_after(error: &ClientError, reconnects: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 0,
        _ => reconnects,
    }
}
