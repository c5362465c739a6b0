//! Inbound request and response models.
//!
//! These are the shapes internal clients speak: the legacy completion-style
//! request, the chat-style request, and the uniform response envelope.

use serde::{Deserialize, Serialize};

/// Legacy completion-style chat request.
///
/// The caller supplies a free-form message plus an accumulated conversation
/// prompt; role labels frame the exchange and default to literal markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Caller identity; used for credential selection
    #[serde(default)]
    pub user_id: i64,

    /// The message to send
    #[serde(default)]
    pub msg: String,

    /// Accumulated conversation so far
    #[serde(default)]
    pub prompt: String,

    /// Label for the asking side, e.g. "You"
    #[serde(default)]
    pub role_asker: String,

    /// Label for the answering side, e.g. "AI"
    #[serde(default)]
    pub role_ai: String,

    /// Requested completion count
    #[serde(default)]
    pub n: i32,
}

/// A single role/content message in a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

/// Chat-style request as accepted from internal clients.
///
/// Mirrors the provider's chat-completion parameters, plus the caller
/// identity used for credential selection and per-caller attribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionCall {
    /// Caller identity
    #[serde(default)]
    pub user_id: i64,

    /// Model identifier; defaults to the baseline model when empty
    #[serde(default)]
    pub model: String,

    /// Ordered conversation messages
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f64,

    /// Nucleus sampling top-p
    #[serde(default)]
    pub top_p: f64,

    /// Requested completion count
    #[serde(default)]
    pub n: i32,

    /// Stop sequences
    #[serde(default)]
    pub stop: Vec<String>,

    /// Maximum output tokens
    #[serde(default)]
    pub max_tokens: u32,

    /// Frequency penalty
    #[serde(default)]
    pub frequency_penalty: f64,

    /// Presence penalty
    #[serde(default)]
    pub presence_penalty: f64,
}

/// Client-facing reply for the legacy completion flavor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The completion text
    pub message: String,

    /// The conversation prompt with the completion appended, ready to be
    /// sent back on the next turn
    pub prompt: String,

    pub role_ai: String,
    pub role_asker: String,
}

/// Uniform response envelope for every inbound endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Numeric status code; 0 for success
    pub code: u32,

    /// Error flag
    pub error: bool,

    /// Human-readable message
    pub message: String,

    /// Payload, when the call succeeded
    pub data: Option<T>,

    /// Request trace identifier
    pub trace_id: String,
}

impl<T> ApiResponse<T> {
    /// Successful envelope wrapping `data`.
    pub fn ok(data: T, trace_id: String) -> Self {
        Self {
            code: crate::core::error::CODE_OK,
            error: false,
            message: "ok".to_string(),
            data: Some(data),
            trace_id,
        }
    }

    /// Error envelope with the given code and message.
    pub fn err(code: u32, message: String, trace_id: String) -> Self {
        Self {
            code,
            error: true,
            message,
            data: None,
            trace_id,
        }
    }
}
