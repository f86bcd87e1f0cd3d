//! Groq chat-completion provider.
//!
//! Calls the OpenAI-compatible `/chat/completions` endpoint once per turn.
//! No retry: a failed call is reported to the responder as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::ProviderConfig;
use super::{ChatModel, LlmError};
use crate::prompt::{Prompt, PromptEntry};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptEntry],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat model backed by the Groq API (or any OpenAI-compatible endpoint).
#[derive(Debug, Clone)]
pub struct GroqChatModel {
    client: Client,
    config: ProviderConfig,
}

impl GroqChatModel {
    /// Build a model client; fails if the config cannot authenticate.
    pub fn new(client: Client, config: ProviderConfig) -> Result<Self, LlmError> {
        config.validate()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatModel for GroqChatModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let url = self.config.completions_url();
        debug!(model = %self.config.model, entries = prompt.len(), "requesting completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages: prompt.entries(),
            })
            .send()
            .await
            .map_err(|e| LlmError::Provider(format!("Groq request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(LlmError::Provider(format!(
                "Groq completion failed: {status} {body}"
            )));
        }

        let data: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Provider(format!("Groq response parse error: {e}")))?;

        data.choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Provider("Groq returned empty choices array".to_string()))
            .map(|choice| choice.message.content.unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
