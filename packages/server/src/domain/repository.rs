//! History Repository trait 定義

use async_trait::async_trait;

use super::ChatMessage;

/// In-memory tail of recent messages, replayed to new joiners.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// メッセージを追加し、容量超過で追い出された最古のメッセージを返す
    async fn append(&self, message: ChatMessage) -> Option<ChatMessage>;

    /// 現在の履歴のコピー（古い順）
    async fn snapshot(&self) -> Vec<ChatMessage>;

    /// 保持しているメッセージ数
    async fn count(&self) -> usize;
}
