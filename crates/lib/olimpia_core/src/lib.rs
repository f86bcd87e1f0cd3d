//! # olimpia_core
//!
//! Core domain logic for OlimpIA.
//!
//! - [`grounding`] — loads the grounding document once at startup
//! - [`prompt`] — turns caller messages into a role-tagged prompt
//! - [`llm`] — chat-completion provider client
//! - [`responder`] — ties the three together and never fails past its boundary

pub mod grounding;
pub mod llm;
pub mod prompt;
pub mod responder;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
