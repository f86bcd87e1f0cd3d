//! Chat responder.
//!
//! Owns the grounding document and the model handle. [`ChatResponder::respond`]
//! reports failures by kind; [`ChatResponder::reply`] logs them and falls back
//! to a fixed apology so callers always get a string.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::grounding::GroundingDocument;
use crate::llm::{ChatModel, LlmError};
use crate::prompt::{ChatMessage, Prompt, PromptError, build_prompt};

/// Returned to the caller whenever a reply cannot be produced.
pub const APOLOGY: &str = "Sorry, there was an error processing your message.";

/// Why a reply could not be produced.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] PromptError),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] LlmError),
}

impl ResponderError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponderError::MalformedInput(_) => "malformed_input",
            ResponderError::Upstream(_) => "upstream",
        }
    }
}

/// Grounded chat responder.
pub struct ChatResponder {
    model: Arc<dyn ChatModel>,
    document: GroundingDocument,
}

impl ChatResponder {
    pub fn new(model: Arc<dyn ChatModel>, document: GroundingDocument) -> Self {
        Self { model, document }
    }

    pub fn document(&self) -> &GroundingDocument {
        &self.document
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Build the prompt from `messages` and ask the model for a reply.
    pub async fn respond(&self, messages: &[Value]) -> Result<String, ResponderError> {
        let prompt = build_prompt(messages, &self.document)?;
        self.complete(&prompt).await
    }

    /// Ask the model to answer a history that was validated at the boundary.
    pub async fn respond_to_history(
        &self,
        history: &[ChatMessage],
    ) -> Result<String, ResponderError> {
        self.complete(&Prompt::from_history(&self.document, history))
            .await
    }

    /// Like [`respond`](Self::respond), but never fails: errors are logged
    /// and replaced by [`APOLOGY`].
    pub async fn reply(&self, messages: &[Value]) -> String {
        or_apology(self.respond(messages).await)
    }

    /// Like [`respond_to_history`](Self::respond_to_history), but never fails.
    pub async fn reply_to_history(&self, history: &[ChatMessage]) -> String {
        or_apology(self.respond_to_history(history).await)
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ResponderError> {
        debug!(entries = prompt.len(), model = self.model.model_name(), "prompt built");
        Ok(self.model.complete(prompt).await?)
    }
}

fn or_apology(result: Result<String, ResponderError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "failed to generate reply");
            APOLOGY.to_string()
        }
    }
}
