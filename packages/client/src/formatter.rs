//! Message formatting utilities for client display.

use nightowl_server::infrastructure::dto::websocket::ChatMessageDto;
use nightowl_shared::time::{parse_iso8601, to_clock_time};

use crate::domain::{Incoming, parse_frame};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any text frame from the relay
    pub fn format_frame(text: &str) -> String {
        match parse_frame(text) {
            Incoming::Chat(message) => Self::format_chat_message(&message),
            Incoming::System(announcement) => announcement,
        }
    }

    /// Format a chat message as `@alice: hi  (20:15)`.
    ///
    /// A timestamp that cannot be parsed is shown as received.
    pub fn format_chat_message(message: &ChatMessageDto) -> String {
        let time = parse_iso8601(&message.timestamp)
            .map(|instant| to_clock_time(&instant))
            .unwrap_or_else(|| message.timestamp.clone());
        format!("@{}: {}  ({})", message.client_id, message.content, time)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("(ignored {} bytes of binary data)", byte_count)
    }
}
