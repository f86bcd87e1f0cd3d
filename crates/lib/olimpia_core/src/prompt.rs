//! Prompt construction.
//!
//! Reshapes the caller-supplied message history into the role-tagged
//! sequence sent to the model, behind a system entry that carries the
//! grounding document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::grounding::GroundingDocument;

/// System instruction; `{informacoes}` is replaced by the grounding text.
pub const SYSTEM_TEMPLATE: &str = "You are a friendly assistant named OlimpIA that uses the following information to formulate its answers: {informacoes}";

const GROUNDING_PLACEHOLDER: &str = "{informacoes}";

pub const SYSTEM_ROLE: &str = "system";
pub const DEFAULT_SENDER: &str = "user";

/// Errors raised for entries that are objects but carry the wrong field types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("mensagens[{index}]: {reason}")]
    MalformedMessage { index: usize, reason: String },
}

/// One chat turn as the frontend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub content: String,
}

impl ChatMessage {
    /// Read `sender` and `content` from a JSON object, applying defaults.
    pub fn from_object(index: usize, obj: &Map<String, Value>) -> Result<Self, PromptError> {
        Ok(Self {
            sender: string_field(index, obj, "sender", DEFAULT_SENDER)?,
            content: string_field(index, obj, "content", "")?,
        })
    }

    /// Model-API role for this sender: `"bot"` becomes `"assistant"`,
    /// anything else passes through.
    pub fn role(&self) -> &str {
        match self.sender.as_str() {
            "bot" => "assistant",
            other => other,
        }
    }
}

fn string_field(
    index: usize,
    obj: &Map<String, Value>,
    key: &str,
    default: &str,
) -> Result<String, PromptError> {
    match obj.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(PromptError::MalformedMessage {
            index,
            reason: format!("`{key}` must be a string, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check that every entry is an object with string fields.
///
/// Used at the HTTP boundary, where malformed entries are rejected instead of
/// being skipped.
pub fn validate_messages(messages: &[Value]) -> Result<Vec<ChatMessage>, PromptError> {
    messages
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(obj) => ChatMessage::from_object(index, obj),
            other => Err(PromptError::MalformedMessage {
                index,
                reason: format!("expected an object, got {}", json_kind(other)),
            }),
        })
        .collect()
}

/// A single `(role, content)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub role: String,
    pub content: String,
}

impl PromptEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Ordered prompt; the system entry is always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    entries: Vec<PromptEntry>,
}

impl Prompt {
    /// Start a prompt with only the rendered system entry.
    pub fn new(document: &GroundingDocument) -> Self {
        Self {
            entries: vec![PromptEntry::new(SYSTEM_ROLE, render_system(document))],
        }
    }

    /// System entry followed by every turn of an already-validated history.
    pub fn from_history(document: &GroundingDocument, history: &[ChatMessage]) -> Self {
        let mut prompt = Self::new(document);
        for message in history {
            prompt.push(message);
        }
        prompt
    }

    pub fn push(&mut self, message: &ChatMessage) {
        self.entries
            .push(PromptEntry::new(message.role(), message.content.clone()));
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the system entry is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render the system instruction with the grounding text substituted verbatim.
pub fn render_system(document: &GroundingDocument) -> String {
    SYSTEM_TEMPLATE.replacen(GROUNDING_PLACEHOLDER, document.as_str(), 1)
}

/// Build the prompt from raw JSON entries.
///
/// Non-object entries are skipped with a warning. Objects whose `sender` or
/// `content` is not a string are an error.
pub fn build_prompt(messages: &[Value], document: &GroundingDocument) -> Result<Prompt, PromptError> {
    let mut prompt = Prompt::new(document);

    for (index, value) in messages.iter().enumerate() {
        let Value::Object(obj) = value else {
            warn!(index, kind = json_kind(value), "skipping invalid message");
            continue;
        };
        prompt.push(&ChatMessage::from_object(index, obj)?);
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(text: &str) -> GroundingDocument {
        GroundingDocument::from_text(text)
    }

    fn as_values(v: Value) -> Vec<Value> {
        v.as_array().cloned().expect("array")
    }

    #[test]
    fn user_message_follows_system_entry() {
        let messages = as_values(json!([{"sender": "user", "content": "Hello"}]));
        let prompt = build_prompt(&messages, &doc("Shop sells car parts.")).expect("prompt");

        assert_eq!(
            prompt.entries(),
            &[
                PromptEntry::new(
                    "system",
                    "You are a friendly assistant named OlimpIA that uses the following \
                     information to formulate its answers: Shop sells car parts."
                ),
                PromptEntry::new("user", "Hello"),
            ]
        );
    }

    #[test]
    fn bot_sender_becomes_assistant() {
        let messages = as_values(json!([
            {"sender": "bot", "content": "Hi, how can I help?"},
            {"sender": "user", "content": "Brake pads?"},
            {"sender": "bot", "content": "We have them."}
        ]));
        let prompt = build_prompt(&messages, &doc("")).expect("prompt");

        let roles: Vec<&str> = prompt.entries().iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, ["system", "assistant", "user", "assistant"]);
    }

    #[test]
    fn unknown_sender_passes_through() {
        let messages = as_values(json!([{"sender": "moderator", "content": "x"}]));
        let prompt = build_prompt(&messages, &doc("")).expect("prompt");
        assert_eq!(prompt.entries()[1].role, "moderator");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let messages = as_values(json!([{}]));
        let prompt = build_prompt(&messages, &doc("")).expect("prompt");
        assert_eq!(prompt.entries()[1], PromptEntry::new("user", ""));
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let messages = as_values(json!([
            "hello",
            42,
            {"sender": "user", "content": "kept"},
            null,
            ["nested"]
        ]));
        let prompt = build_prompt(&messages, &doc("")).expect("prompt");

        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt.entries()[1].content, "kept");
    }

    #[test]
    fn empty_history_yields_only_system_entry() {
        let prompt = build_prompt(&[], &doc("catalogue")).expect("prompt");
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt.entries()[0].role, SYSTEM_ROLE);
    }

    #[test]
    fn grounding_is_substituted_verbatim() {
        let text = "Line one\n  {braces} and $dollars \\ backslash";
        let prompt = build_prompt(&[], &doc(text)).expect("prompt");
        let system = &prompt.entries()[0].content;
        assert!(system.ends_with(text));
        assert!(!system.contains(GROUNDING_PLACEHOLDER));
    }

    #[test]
    fn order_is_preserved() {
        let messages = as_values(json!([
            {"sender": "user", "content": "1"},
            {"sender": "bot", "content": "2"},
            {"sender": "user", "content": "3"}
        ]));
        let prompt = build_prompt(&messages, &doc("")).expect("prompt");
        let contents: Vec<&str> = prompt.entries()[1..]
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(contents, ["1", "2", "3"]);
    }

    #[test]
    fn non_string_content_is_malformed() {
        let messages = as_values(json!([
            {"sender": "user", "content": "ok"},
            {"sender": "user", "content": 7}
        ]));
        let err = build_prompt(&messages, &doc("")).unwrap_err();
        assert_eq!(
            err,
            PromptError::MalformedMessage {
                index: 1,
                reason: "`content` must be a string, got number".into(),
            }
        );
    }

    #[test]
    fn validate_rejects_non_objects_with_index() {
        let messages = as_values(json!([{"sender": "user", "content": "a"}, "oops"]));
        let err = validate_messages(&messages).unwrap_err();
        assert_eq!(err.to_string(), "mensagens[1]: expected an object, got string");
    }

    #[test]
    fn validated_history_builds_the_same_prompt() {
        let messages = as_values(json!([
            {"sender": "user", "content": "Hello"},
            {"sender": "bot", "content": "Hi!"}
        ]));
        let history = validate_messages(&messages).expect("valid");
        let document = doc("Shop sells car parts.");

        assert_eq!(
            Prompt::from_history(&document, &history),
            build_prompt(&messages, &document).expect("prompt")
        );
    }

    #[test]
    fn validate_accepts_well_formed_history() {
        let messages = as_values(json!([
            {"sender": "user", "content": "a"},
            {"sender": "bot", "content": "b"}
        ]));
        let parsed = validate_messages(&messages).expect("valid");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].role(), "assistant");
    }
}
