//! Wire models for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Conversation so far, oldest first. Entries are validated by the handler.
    pub mensagens: Vec<Value>,
}

// Built from a raw `Value` rather than derived: a derived struct
// `Deserialize` also accepts a JSON array positionally.
impl TryFrom<Value> for ChatRequest {
    type Error = AppError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::Internal(
                "request body is not a JSON object".to_string(),
            ));
        };
        let mensagens = match fields.remove("mensagens") {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(AppError::Internal(
                    "`mensagens` is not an array".to_string(),
                ));
            }
        };
        Ok(Self { mensagens })
    }
}

/// Successful `POST /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub resposta: String,
}

/// Error body. `resposta` keeps the frontend's rendering path working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub resposta: String,
    pub error: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    #[serde(rename = "groundingChars")]
    pub grounding_chars: usize,
    #[serde(rename = "placeholderReply")]
    pub placeholder_reply: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_body_yields_messages() {
        let req = ChatRequest::try_from(json!({"mensagens": [{"sender": "user"}]})).expect("ok");
        assert_eq!(req.mensagens, vec![json!({"sender": "user"})]);
    }

    #[test]
    fn missing_mensagens_is_empty() {
        let req = ChatRequest::try_from(json!({"documento": ""})).expect("ok");
        assert!(req.mensagens.is_empty());
    }

    #[test]
    fn array_body_is_rejected() {
        let err = ChatRequest::try_from(json!([[{"sender": "user", "content": "hi"}]])).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn non_array_mensagens_is_rejected() {
        for body in [json!({"mensagens": null}), json!({"mensagens": "hi"})] {
            let err = ChatRequest::try_from(body).unwrap_err();
            assert!(matches!(err, AppError::Internal(_)));
        }
    }
}
