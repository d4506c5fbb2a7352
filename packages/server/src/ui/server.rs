//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use nightowl_shared::time::{Clock, SystemClock};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{MessageLog, MessageLogError, OUTBOUND_QUEUE_CAPACITY},
    infrastructure::{
        log::CsvMessageLog, registry::WebSocketConnectionRegistry,
        repository::InMemoryHistoryRepository,
    },
    usecase::{
        DispatchLock, GetHistoryUseCase, JoinChatUseCase, LeaveChatUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{get_history, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind or serve: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    MessageLog(#[from] MessageLogError),
}

/// WebSocket chat relay
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::parse();
/// let server = Server::from_config(&config).await?;
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Flushed once the listener has stopped
    message_log: Arc<dyn MessageLog>,
}

impl Server {
    pub fn new(state: AppState, message_log: Arc<dyn MessageLog>) -> Self {
        Self {
            state: Arc::new(state),
            message_log,
        }
    }

    /// Wire the relay from configuration using the system clock
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Wire the relay from configuration.
    ///
    /// Dependencies are created in order:
    /// 1. Message log (opened, header written if new)
    /// 2. History repository and connection registry
    /// 3. UseCases sharing one dispatch lock
    pub async fn with_clock(
        config: &ServerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServerError> {
        // 1. Message log
        let message_log: Arc<dyn MessageLog> =
            Arc::new(CsvMessageLog::open(&config.log_path).await?);

        // 2. History and registry
        let history = Arc::new(InMemoryHistoryRepository::with_capacity(
            config.history_capacity,
        ));
        let registry = Arc::new(WebSocketConnectionRegistry::new());

        // 3. UseCases
        let dispatch = Arc::new(DispatchLock::new());
        let state = AppState {
            join_chat_usecase: Arc::new(JoinChatUseCase::new(
                registry.clone(),
                history.clone(),
                dispatch.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                registry.clone(),
                history.clone(),
                message_log.clone(),
                clock,
                dispatch.clone(),
            )),
            leave_chat_usecase: Arc::new(LeaveChatUseCase::new(registry, dispatch)),
            get_history_usecase: Arc::new(GetHistoryUseCase::new(history)),
            // 履歴のリプレイ全体と通常の配送が収まる大きさ
            outbound_capacity: config
                .history_capacity
                .saturating_add(OUTBOUND_QUEUE_CAPACITY),
        };

        tracing::info!(
            "Relay ready (history capacity {}, log {})",
            config.history_capacity,
            config.log_path.display()
        );
        Ok(Self::new(state, message_log))
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{client_id}", get(websocket_handler))
            .route("/ws", get(websocket_handler))
            .route("/ws/", get(websocket_handler))
            // HTTP エンドポイント
            .route("/history", get(get_history))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    pub async fn run(self, config: &ServerConfig) -> Result<(), ServerError> {
        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/<client_id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then flush the message log
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.message_log.flush().await?;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
