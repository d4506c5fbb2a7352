//! UseCase 層
//!
//! 入室・メッセージ送信・退室・履歴取得のユースケース。入室・送信・退室は
//! `DispatchLock` で直列化され、全ての受信者が同じ順序でフレームを観測します。

mod dispatch;
mod get_history;
mod join_chat;
mod leave_chat;
mod send_message;

pub use dispatch::DispatchLock;
pub use get_history::GetHistoryUseCase;
pub use join_chat::{JoinChatUseCase, JoinSummary};
pub use leave_chat::{LeaveChatUseCase, LeaveOutcome};
pub use send_message::{AcceptedMessage, SendMessageUseCase};
