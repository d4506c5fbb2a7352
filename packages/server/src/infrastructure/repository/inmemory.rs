//! InMemory History Repository 実装
//!
//! ドメイン層が定義する HistoryRepository trait の具体的な実装。
//! `History` エンティティをそのままストレージとして使用します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, History, HistoryRepository};

/// インメモリ History Repository 実装
pub struct InMemoryHistoryRepository {
    history: Arc<Mutex<History>>,
}

impl InMemoryHistoryRepository {
    pub fn new(history: Arc<Mutex<History>>) -> Self {
        Self { history }
    }

    /// Empty history bounded to `capacity` messages
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Arc::new(Mutex::new(History::new(capacity))))
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, message: ChatMessage) -> Option<ChatMessage> {
        let mut history = self.history.lock().await;
        history.push(message)
    }

    async fn snapshot(&self) -> Vec<ChatMessage> {
        let history = self.history.lock().await;
        history.to_vec()
    }

    async fn count(&self) -> usize {
        let history = self.history.lock().await;
        history.len()
    }
}
