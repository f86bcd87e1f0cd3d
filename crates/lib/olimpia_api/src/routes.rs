//! Route path constants.

/// POST /chat — answer the latest turn of a conversation.
pub const POST_CHAT: &str = "/chat";

/// GET /health — liveness plus grounding status.
pub const GET_HEALTH: &str = "/health";
