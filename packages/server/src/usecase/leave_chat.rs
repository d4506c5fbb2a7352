//! UseCase: 退室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//! - 登録解除と残りの参加者への退室のお知らせ
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退室と通知
//! - エッジケース：最後の参加者の退室（通知対象なし）
//! - エッジケース：同じ client_id の新しい接続に置き換えられた古い接続の終了

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionId, ConnectionRegistry, Delivery, Outbound};

use super::DispatchLock;

/// 退室結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The registration was removed and the departure announced
    Left(Delivery),
    /// Another connection owns the client id now; nothing was changed
    Superseded,
}

/// 退室のユースケース
pub struct LeaveChatUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    dispatch: Arc<DispatchLock>,
}

impl LeaveChatUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, dispatch: Arc<DispatchLock>) -> Self {
        Self { registry, dispatch }
    }

    /// 退室を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 退室するクライアントの ID
    /// * `connection_id` - 終了した接続。この接続がまだ登録を保持している場合のみ解除する
    pub async fn execute(&self, client_id: &ClientId, connection_id: ConnectionId) -> LeaveOutcome {
        let _dispatch = self.dispatch.acquire().await;

        if !self
            .registry
            .unregister_connection(client_id, connection_id)
            .await
        {
            return LeaveOutcome::Superseded;
        }

        let delivery = self
            .registry
            .broadcast(&Outbound::Left(client_id.clone()))
            .await;
        LeaveOutcome::Left(delivery)
    }
}
