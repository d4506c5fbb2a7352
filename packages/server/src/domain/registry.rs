//! Connection Registry trait 定義
//!
//! 接続中のクライアントと送信チャンネルの対応を管理するインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, ClientId, ConnectionId};

/// Default bound of a connection's outbound queue
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Outbound frames for one connection, drained by that connection's writer task
pub type OutboundChannel = mpsc::Sender<String>;

/// What the relay delivers to clients. The registry renders it to a wire frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// An accepted chat message, live or replayed from history
    Chat(ChatMessage),
    /// Join announcement
    Joined(ClientId),
    /// Departure announcement
    Left(ClientId),
}

/// 1 接続分の送信ハンドル
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: OutboundChannel,
}

impl ConnectionHandle {
    /// Wrap a sender under a freshly generated [`ConnectionId`]
    pub fn new(sender: OutboundChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame without waiting. Fails when the writer has gone away or
    /// its queue is full.
    pub fn send(&self, frame: &str) -> Result<(), mpsc::error::TrySendError<String>> {
        self.sender.try_send(frame.to_string())
    }
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handles that accepted the frame
    pub delivered: usize,
    /// Handles whose writer had gone away or whose queue was full
    pub failed: usize,
}

/// Connection Registry trait
///
/// `ClientId` ごとに 1 つの `ConnectionHandle` を保持する。同じ ID で再登録すると
/// 後勝ちで上書きされる。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 登録（上書き）。置き換えられた古いハンドルを返す
    async fn register(
        &self,
        client_id: ClientId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle>;

    /// 登録解除。存在しない ID の場合は何もせず `false` を返す
    async fn unregister(&self, client_id: &ClientId) -> bool;

    /// `connection_id` がまだその ID を保持している場合のみ登録解除する
    async fn unregister_connection(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> bool;

    /// 特定のクライアントに送信。宛先が存在し送信できた場合 `true`
    async fn send_to(&self, client_id: &ClientId, outbound: &Outbound) -> bool;

    /// 登録中の全ハンドルに送信。1 件の失敗が残りの配送を妨げない
    async fn broadcast(&self, outbound: &Outbound) -> Delivery;

    /// 接続中の全てのクライアント ID を取得
    async fn connected_client_ids(&self) -> Vec<ClientId>;
}
