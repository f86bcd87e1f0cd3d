//! Provider configuration.

use std::fmt;

use super::LlmError;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Settings for the OpenAI-compatible completion endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Secret API key sent as a bearer token.
    pub api_key: String,
    /// Model identifier, e.g. `llama-3.3-70b-versatile`.
    pub model: String,
    /// API root without the `/chat/completions` suffix.
    pub base_url: String,
}

impl ProviderConfig {
    /// Config with the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reject configs that can never authenticate.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::Config("GROQ_API_KEY is required".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
