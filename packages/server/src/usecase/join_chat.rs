//! UseCase: 入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 登録 → 履歴のリプレイ（新規参加者のみ）→ 入室のお知らせ（全員）の順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：空の部屋への入室、履歴のある部屋への入室
//! - エッジケース：同じ client_id での再入室（後勝ちで置き換え）

use std::sync::Arc;

use crate::domain::{
    ClientId, ConnectionHandle, ConnectionId, ConnectionRegistry, Delivery, HistoryRepository,
    Outbound,
};

use super::DispatchLock;

/// 入室結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary {
    /// Connection id of this registration
    pub connection_id: ConnectionId,
    /// History frames queued for the joiner
    pub replayed: usize,
    /// Earlier connection that held the same client id, if any
    pub displaced: Option<ConnectionId>,
    /// Fan-out of the join announcement
    pub announced: Delivery,
}

/// 入室のユースケース
pub struct JoinChatUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    history: Arc<dyn HistoryRepository>,
    dispatch: Arc<DispatchLock>,
}

impl JoinChatUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        history: Arc<dyn HistoryRepository>,
        dispatch: Arc<DispatchLock>,
    ) -> Self {
        Self {
            registry,
            history,
            dispatch,
        }
    }

    /// 入室を実行
    ///
    /// Registers `handle` under `client_id` (overwriting any earlier
    /// registration), queues the current history to the joiner only, then
    /// announces the join to everyone including the joiner.
    pub async fn execute(&self, client_id: ClientId, handle: ConnectionHandle) -> JoinSummary {
        let connection_id = handle.id();
        let _dispatch = self.dispatch.acquire().await;

        // 1. 登録（後勝ち）
        let displaced = self
            .registry
            .register(client_id.clone(), handle)
            .await
            .map(|old| old.id());
        if let Some(old) = displaced {
            tracing::warn!(
                "Client '{}' re-joined; connection {} replaces {}",
                client_id,
                connection_id,
                old
            );
        }

        // 2. 履歴のリプレイ（新規参加者のみ）
        let mut replayed = 0;
        for message in self.history.snapshot().await {
            if self
                .registry
                .send_to(&client_id, &Outbound::Chat(message))
                .await
            {
                replayed += 1;
            }
        }

        // 3. 入室のお知らせ（本人を含む全員）
        let announced = self
            .registry
            .broadcast(&Outbound::Joined(client_id.clone()))
            .await;

        tracing::info!(
            "Client '{}' joined (replayed {} message(s))",
            client_id,
            replayed
        );

        JoinSummary {
            connection_id,
            replayed,
            displaced,
            announced,
        }
    }
}
