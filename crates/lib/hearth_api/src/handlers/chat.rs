//! Chat request handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use hearth_core::chat::ChatRequest;
use hearth_core::relay::relay;
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::models::ChatResponse;

/// `POST /api/chat` — relay a message to the model and return the sanitized reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    info!(
        message_len = request.message.len(),
        history_turns = request.conversation_history.len(),
        "received chat message"
    );

    // Rendered per request so preference updates reach the model.
    let prefs = state.preferences.get();
    let reply = relay(state.model.as_ref(), &prefs, &request).await?.reply;

    info!(reply_len = reply.len(), "chat reply ready");
    Ok(Json(ChatResponse {
        response: reply.clone(),
        reply,
    }))
}
