//! WebSocket frame DTOs.
//!
//! Outbound frames come in two shapes:
//!
//! - chat messages, JSON objects `{"client_id", "content", "timestamp"}`
//! - system announcements, plain text such as `System: alice has joined the chat.`
//!
//! Clients tell them apart by attempting a JSON parse. Inbound frames are
//! raw text and carry only the message content.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ClientId;

/// Serialized chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub client_id: String,
    pub content: String,
    /// ISO-8601 receipt time
    pub timestamp: String,
}

impl ChatMessageDto {
    /// Render as a JSON text frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Plain-text announcements broadcast by the relay itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemNotice {
    Joined(ClientId),
    Left(ClientId),
}

impl fmt::Display for SystemNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joined(client_id) => write!(f, "System: {} has joined the chat.", client_id),
            Self::Left(client_id) => write!(f, "System: {} has left the chat.", client_id),
        }
    }
}
