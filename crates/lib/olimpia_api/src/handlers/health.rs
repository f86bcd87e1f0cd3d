//! Health endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /health` — reports version, model and the loaded grounding size.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version().to_string(),
        model: state.responder.model_name().to_string(),
        grounding_chars: state.responder.document().char_count(),
        placeholder_reply: state.config.placeholder_reply,
    })
}
