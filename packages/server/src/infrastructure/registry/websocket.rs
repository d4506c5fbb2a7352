//! WebSocket 接続を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続ごとの `OutboundChannel` を `ClientId` に対応付けて管理
//! - クライアントへのフレーム送信（send_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket 自体は UI 層（`ui::handler::websocket`）が保持します。
//! このレジストリはチャンネルの送信側だけを持ち、実際のソケット書き込みは
//! 接続ごとの writer タスクが行います。ブロードキャスト中にソケット I/O を
//! 待たないため、遅いクライアントが他のクライアントへの配送を止めることはありません。
//! 送信キューは有界で、満杯のキューへの送信は配送失敗として数えます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ClientId, ConnectionHandle, ConnectionId, ConnectionRegistry, Delivery, Outbound},
    infrastructure::dto::conversion::render_frame,
};

/// WebSocket を使った ConnectionRegistry 実装
#[derive(Default)]
pub struct WebSocketConnectionRegistry {
    /// 接続中のクライアントの送信ハンドル
    clients: Mutex<HashMap<ClientId, ConnectionHandle>>,
}

impl WebSocketConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register(
        &self,
        client_id: ClientId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let mut clients = self.clients.lock().await;
        tracing::debug!(
            "Client '{}' registered with connection {}",
            client_id,
            handle.id()
        );
        clients.insert(client_id, handle)
    }

    async fn unregister(&self, client_id: &ClientId) -> bool {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(client_id).is_some();
        if removed {
            tracing::debug!("Client '{}' unregistered", client_id);
        }
        removed
    }

    async fn unregister_connection(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> bool {
        let mut clients = self.clients.lock().await;
        match clients.get(client_id) {
            Some(handle) if handle.id() == connection_id => {
                clients.remove(client_id);
                tracing::debug!(
                    "Client '{}' unregistered (connection {})",
                    client_id,
                    connection_id
                );
                true
            }
            Some(_) => {
                tracing::debug!(
                    "Connection {} no longer owns '{}', leaving registry untouched",
                    connection_id,
                    client_id
                );
                false
            }
            None => false,
        }
    }

    async fn send_to(&self, client_id: &ClientId, outbound: &Outbound) -> bool {
        let frame = match render_frame(outbound) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to render frame for client '{}': {}", client_id, e);
                return false;
            }
        };
        let clients = self.clients.lock().await;

        let Some(handle) = clients.get(client_id) else {
            return false;
        };
        match handle.send(&frame) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to push frame to client '{}': {}", client_id, e);
                false
            }
        }
    }

    async fn broadcast(&self, outbound: &Outbound) -> Delivery {
        let clients = self.clients.lock().await;
        let mut delivery = Delivery::default();

        let frame = match render_frame(outbound) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to render broadcast frame: {}", e);
                delivery.failed = clients.len();
                return delivery;
            }
        };

        for (client_id, handle) in clients.iter() {
            // 一部の送信失敗は許容し、残りのクライアントへの配送を続ける
            if let Err(e) = handle.send(&frame) {
                tracing::warn!("Failed to push frame to client '{}': {}", client_id, e);
                delivery.failed += 1;
            } else {
                delivery.delivered += 1;
            }
        }

        tracing::debug!(
            "Broadcast reached {} client(s), {} failed",
            delivery.delivered,
            delivery.failed
        );
        delivery
    }

    async fn connected_client_ids(&self) -> Vec<ClientId> {
        let clients = self.clients.lock().await;
        clients.keys().cloned().collect()
    }
}
