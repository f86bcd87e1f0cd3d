//! Chat-completion providers.
//!
//! The responder only sees the [`ChatModel`] trait; [`groq::GroqChatModel`]
//! is the production implementation and tests substitute their own.

pub mod config;
pub mod groq;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::Prompt;

pub use config::ProviderConfig;
pub use groq::GroqChatModel;

/// Errors that can occur while asking the model for a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// A hosted model that turns a prompt into a single reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit the full prompt and return the text of the top choice.
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
