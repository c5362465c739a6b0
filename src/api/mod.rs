//! API layer for the chat gateway.
//!
//! HTTP handlers, the router, and the inbound request/response models.

pub mod handlers;
pub mod models;

// Re-export commonly used types
pub use handlers::{build_router, health, send_chat_msg, send_msg, AppState};
pub use models::{ApiResponse, ChatCompletionCall, ChatMessage, ChatReply, ChatRequest};
