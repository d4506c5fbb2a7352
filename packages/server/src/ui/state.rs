//! Shared application state.

use std::sync::Arc;

use crate::usecase::{GetHistoryUseCase, JoinChatUseCase, LeaveChatUseCase, SendMessageUseCase};

/// Shared application state
pub struct AppState {
    /// JoinChatUseCase（入室のユースケース）
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveChatUseCase（退室のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// GetHistoryUseCase（履歴取得のユースケース）
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    /// Bound of each connection's outbound queue
    pub outbound_capacity: usize,
}
