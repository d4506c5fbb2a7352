//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信時刻の付与、履歴への追加、メッセージログへの追記、送信者を含む全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 履歴は容量で切り詰められるが、メッセージログは全件を到着順に保持することを保証
//! - メッセージログの書き込み失敗が配送を止めないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト（エコーを含む）
//! - 異常系：メッセージログの書き込み失敗
//! - エッジケース：101 件目のメッセージ

use std::sync::Arc;

use nightowl_shared::time::Clock;

use crate::domain::{
    ChatMessage, ClientId, ConnectionRegistry, Delivery, HistoryRepository, MessageContent,
    MessageLog, Outbound, Timestamp,
};

use super::DispatchLock;

/// 受理したメッセージと配送結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMessage {
    pub message: ChatMessage,
    pub delivery: Delivery,
    /// Whether the message log accepted the row
    pub logged: bool,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    history: Arc<dyn HistoryRepository>,
    message_log: Arc<dyn MessageLog>,
    clock: Arc<dyn Clock>,
    dispatch: Arc<DispatchLock>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        history: Arc<dyn HistoryRepository>,
        message_log: Arc<dyn MessageLog>,
        clock: Arc<dyn Clock>,
        dispatch: Arc<DispatchLock>,
    ) -> Self {
        Self {
            registry,
            history,
            message_log,
            clock,
            dispatch,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from_client_id` - 送信者のクライアント ID
    /// * `content` - 受信したテキストそのまま
    ///
    /// # Returns
    ///
    /// 受理したメッセージ、配送結果、メッセージログへの記録の成否
    pub async fn execute(
        &self,
        from_client_id: ClientId,
        content: MessageContent,
    ) -> AcceptedMessage {
        let _dispatch = self.dispatch.acquire().await;

        // 1. 受信時刻を付与してメッセージを作成
        let message = ChatMessage::new(from_client_id, content, Timestamp::new(self.clock.now()));

        // 2. 履歴に追加（容量超過分は古い順に追い出される）
        if let Some(evicted) = self.history.append(message.clone()).await {
            tracing::debug!("History full, evicted message from {}", evicted.timestamp);
        }

        // 3. メッセージログに追記（失敗しても配送は続ける）
        let logged = match self.message_log.append(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to append message to log: {}", e);
                false
            }
        };

        // 4. 送信者を含む全員にブロードキャスト
        let delivery = self
            .registry
            .broadcast(&Outbound::Chat(message.clone()))
            .await;
        tracing::debug!(
            "Message from '{}' delivered to {} client(s)",
            message.client_id,
            delivery.delivered
        );

        AcceptedMessage {
            message,
            delivery,
            logged,
        }
    }
}
