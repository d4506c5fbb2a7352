//! UseCase: 履歴取得

use std::sync::Arc;

use crate::domain::{ChatMessage, HistoryRepository};

/// 履歴取得のユースケース
pub struct GetHistoryUseCase {
    history: Arc<dyn HistoryRepository>,
}

impl GetHistoryUseCase {
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    /// Current in-memory history, most recent last
    pub async fn execute(&self) -> Vec<ChatMessage> {
        self.history.snapshot().await
    }
}
