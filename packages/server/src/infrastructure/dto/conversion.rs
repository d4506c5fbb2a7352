//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, Outbound};
use crate::infrastructure::dto::websocket::{ChatMessageDto, SystemNotice};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            client_id: model.client_id.as_str().to_string(),
            content: model.content.as_str().to_string(),
            timestamp: model.timestamp.to_iso8601(),
        }
    }
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            timestamp: model.timestamp.to_iso8601(),
            client_id: model.client_id.into_string(),
            content: model.content.into_string(),
        }
    }
}

// ========================================
// Outbound → WebSocket frame
// ========================================

/// Render an outbound item as a text frame: chat messages as JSON, system
/// announcements as plain text.
pub fn render_frame(outbound: &Outbound) -> Result<String, serde_json::Error> {
    match outbound {
        Outbound::Chat(message) => ChatMessageDto::from(message).to_frame(),
        Outbound::Joined(client_id) => Ok(SystemNotice::Joined(client_id.clone()).to_string()),
        Outbound::Left(client_id) => Ok(SystemNotice::Left(client_id.clone()).to_string()),
    }
}
