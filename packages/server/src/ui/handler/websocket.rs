//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: a receive loop that turns inbound text
//! frames into accepted messages, and a writer (`pusher_loop`) that drains
//! the connection's outbound channel into the socket. Whichever finishes
//! first ends the connection; the registration is then released through
//! [`ConnectionGuard`] on every exit path.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ConnectionHandle, ConnectionId, MessageContent},
    ui::state::AppState,
    usecase::{LeaveChatUseCase, LeaveOutcome},
};

/// Upgrade handler for `/ws/{client_id}`.
///
/// Also mounted on `/ws` and `/ws/`, where the missing client id is
/// rejected with 400 before the upgrade.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    client_id: Option<Path<String>>,
) -> Result<impl IntoResponse, StatusCode> {
    let client_id = client_id.map(|Path(id)| id).unwrap_or_default();
    let client_id = match ClientId::try_from(client_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state, client_id)))
}

/// What one read from the socket produced
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    /// A text frame, carried verbatim as message content
    Text(String),
    /// A binary frame of the given length, not part of the protocol
    Binary(usize),
    /// Ping / pong, answered by the WebSocket layer itself
    Control,
    /// Close frame or end of stream
    Closed,
    /// Transport or protocol error
    Failed(String),
}

fn classify(frame: Option<Result<Message, axum::Error>>) -> Inbound {
    match frame {
        None | Some(Ok(Message::Close(_))) => Inbound::Closed,
        Some(Err(e)) => Inbound::Failed(e.to_string()),
        Some(Ok(Message::Text(text))) => Inbound::Text(text.as_str().to_owned()),
        Some(Ok(Message::Binary(data))) => Inbound::Binary(data.len()),
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Inbound::Control,
    }
}

/// Releases a connection's registration exactly once.
///
/// [`ConnectionGuard::release`] is the normal path. If the guard is dropped
/// without being released (the connection future was cancelled), the
/// release is spawned onto the runtime instead.
struct ConnectionGuard {
    leave_chat_usecase: Arc<LeaveChatUseCase>,
    client_id: ClientId,
    connection_id: ConnectionId,
    released: bool,
}

impl ConnectionGuard {
    fn new(
        leave_chat_usecase: Arc<LeaveChatUseCase>,
        client_id: ClientId,
        connection_id: ConnectionId,
    ) -> Self {
        Self {
            leave_chat_usecase,
            client_id,
            connection_id,
            released: false,
        }
    }

    async fn release(mut self) -> LeaveOutcome {
        self.released = true;
        self.leave_chat_usecase
            .execute(&self.client_id, self.connection_id)
            .await
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                "No runtime to release '{}' (connection {})",
                self.client_id,
                self.connection_id
            );
            return;
        };
        let usecase = self.leave_chat_usecase.clone();
        let client_id = self.client_id.clone();
        let connection_id = self.connection_id;
        runtime.spawn(async move {
            usecase.execute(&client_id, connection_id).await;
            tracing::info!("Released '{}' after cancelled connection", client_id);
        });
    }
}

/// Spawns a task that drains the outbound channel into the WebSocket sender.
///
/// The task ends when the socket rejects a write or when every sender of
/// the channel is gone, which happens when the registry drops this
/// connection's handle (for example after a re-join with the same id).
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.close().await;
    })
}

/// Turns inbound frames into accepted messages until the connection ends.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    client_id: ClientId,
) {
    loop {
        match classify(receiver.next().await) {
            Inbound::Text(text) => {
                let accepted = state
                    .send_message_usecase
                    .execute(client_id.clone(), MessageContent::new(text))
                    .await;
                if accepted.delivery.failed > 0 {
                    tracing::debug!(
                        "Message from '{}' missed {} client(s)",
                        client_id,
                        accepted.delivery.failed
                    );
                }
            }
            Inbound::Binary(len) => {
                tracing::warn!("Ignoring {} byte binary frame from '{}'", len, client_id);
            }
            Inbound::Control => {
                tracing::debug!("Received ping/pong from '{}'", client_id);
            }
            Inbound::Closed => {
                tracing::info!("Client '{}' closed the connection", client_id);
                return;
            }
            Inbound::Failed(reason) => {
                tracing::error!("WebSocket error from '{}': {}", client_id, reason);
                return;
            }
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel(state.outbound_capacity);

    // JOINING -> CONNECTED
    let summary = state
        .join_chat_usecase
        .execute(client_id.clone(), ConnectionHandle::new(tx))
        .await;
    let guard = ConnectionGuard::new(
        state.leave_chat_usecase.clone(),
        client_id.clone(),
        summary.connection_id,
    );

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = tokio::spawn(receive_loop(receiver, state.clone(), client_id.clone()));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // CONNECTED -> CLOSED
    match guard.release().await {
        LeaveOutcome::Left(delivery) => tracing::info!(
            "Client '{}' left; notified {} client(s)",
            client_id,
            delivery.delivered
        ),
        LeaveOutcome::Superseded => tracing::info!(
            "Connection {} for '{}' closed after being replaced",
            summary.connection_id,
            client_id
        ),
    }
}
