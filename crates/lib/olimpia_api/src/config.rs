//! API server configuration.

/// Reply returned when the responder is bypassed.
pub const PLACEHOLDER_REPLY: &str = "Resposta do bot";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// Answer every chat with [`PLACEHOLDER_REPLY`] instead of calling the model.
    ///
    /// Reproduces the stubbed endpoint the frontend was first built against.
    pub placeholder_reply: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            placeholder_reply: false,
        }
    }
}
