//! Chat request handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;
use tracing::{debug, info};

use olimpia_core::prompt::validate_messages;

use crate::AppState;
use crate::config::PLACEHOLDER_REPLY;
use crate::error::AppResult;
use crate::models::{ChatRequest, ChatResponse};

/// `POST /chat` — answer the conversation in `mensagens`.
///
/// A body that is not a JSON object with an array `mensagens` is a 500.
/// Entries must be objects with string `sender`/`content`; anything else is
/// rejected with 400 before the model is called. Model failures still return
/// 200 with the responder's apology.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    let request = ChatRequest::try_from(body)?;
    let history = validate_messages(&request.mensagens)?;
    debug!(turns = history.len(), "chat request");

    if state.config.placeholder_reply {
        return Ok(Json(ChatResponse {
            resposta: PLACEHOLDER_REPLY.to_string(),
        }));
    }

    let resposta = state.responder.reply_to_history(&history).await;
    info!(turns = history.len(), reply_chars = resposta.chars().count(), "chat answered");

    Ok(Json(ChatResponse { resposta }))
}
