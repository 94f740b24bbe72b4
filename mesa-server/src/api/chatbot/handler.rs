//! Chatbot API Handlers

use axum::extract::State;
use shared::error::{ApiResponse, AppResult};
use shared::models::{ChatStateUpdate, ConversationState};

use crate::api::extract::{AppJson, AppPath};
use crate::core::ServerState;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};

fn validate_chat_id(chat_id: &str) -> AppResult<()> {
    validate_required_text(chat_id, "chat_id", MAX_SHORT_TEXT_LEN)
}

/// GET /api/chatbot/state/{chat_id} - stored state or a fresh default
pub async fn get_state(
    State(state): State<ServerState>,
    AppPath(chat_id): AppPath<String>,
) -> AppResult<ApiResponse<ConversationState>> {
    validate_chat_id(&chat_id)?;
    Ok(ApiResponse::success(state.chat.get(&chat_id)))
}

/// POST /api/chatbot/state/{chat_id} - replace the state wholesale
pub async fn set_state(
    State(state): State<ServerState>,
    AppPath(chat_id): AppPath<String>,
    AppJson(update): AppJson<ChatStateUpdate>,
) -> AppResult<ApiResponse<ConversationState>> {
    validate_chat_id(&chat_id)?;
    let missing = update.data.missing_for(update.step);
    if !missing.is_empty() {
        tracing::debug!(chat_id = %chat_id, step = ?update.step, ?missing, "Draft is incomplete");
    }
    Ok(ApiResponse::success(
        state.chat.set(&chat_id, update.step, update.data),
    ))
}

/// DELETE /api/chatbot/state/{chat_id} - idempotent
pub async fn clear_state(
    State(state): State<ServerState>,
    AppPath(chat_id): AppPath<String>,
) -> AppResult<ApiResponse<()>> {
    validate_chat_id(&chat_id)?;
    state.chat.clear(&chat_id);
    Ok(ApiResponse::ok("Conversation state cleared"))
}
