//! Durable message log trait.

use async_trait::async_trait;

use super::{ChatMessage, MessageLogError};

/// Unbounded, append-only record of every accepted message, in arrival order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append one row for `message`
    async fn append(&self, message: &ChatMessage) -> Result<(), MessageLogError>;

    /// Push buffered rows to the operating system
    async fn flush(&self) -> Result<(), MessageLogError>;
}
