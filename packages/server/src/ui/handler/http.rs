//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        http::{HealthDto, HistoryResponse},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
};

/// Current in-memory history, most recent last
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    let messages = state.get_history_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(messages.into_iter().map(ChatMessageDto::from).collect())
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}
