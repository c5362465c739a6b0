//! Provider wire-format request payloads and the request normalizer.
//!
//! Two request shapes are supported: the legacy single-prompt completion
//! style and the chat message-list style. Every tunable parameter is
//! defaulted and clamped to the provider's documented legal range here,
//! before anything touches the network. Requests whose message content is
//! blank after trimming are rejected without producing a payload.

use crate::api::models::{ChatCompletionCall, ChatMessage, ChatRequest};
use crate::core::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Model used for legacy completion-style requests.
pub const COMPLETION_MODEL: &str = "text-davinci-003";

/// Baseline model for chat-style requests when the caller leaves it unset.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo-0301";

/// Ceiling on output tokens accepted by the provider.
pub const MAX_TOKENS_CEILING: u32 = 4096;

/// Legacy completion-style wire payload (`/v1/completions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stop: [String; 2],
    pub n: i32,
}

/// Chat-style wire payload (`/v1/chat/completions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub top_p: f64,
    pub n: i32,
    pub stream: bool,
    pub stop: Vec<String>,
    pub max_tokens: u32,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub user: String,
}

/// Build the legacy completion payload from a [`ChatRequest`].
///
/// The caller's message is appended to the accumulated conversation, framed
/// by the asker/AI stop markers; the two stop sequences are derived from the
/// role labels so the provider truncates at turn boundaries.
pub fn build_completion_request(req: &ChatRequest) -> Result<CompletionRequest> {
    if req.msg.trim().is_empty() {
        return Err(ServiceError::InvalidParams);
    }

    let n = if req.n < 1 { 1 } else { req.n };
    let asker = req.role_asker.trim();
    let ai = req.role_ai.trim();

    let stop = [
        if asker.is_empty() {
            "You: Bye".to_string()
        } else {
            format!("{}: Bye", asker)
        },
        if ai.is_empty() {
            "AI: Bye".to_string()
        } else {
            format!("{}: Bye", ai)
        },
    ];

    let prompt = format!("{}\n{}{}\n{}", req.prompt, stop[0], req.msg, stop[1]);

    Ok(CompletionRequest {
        model: COMPLETION_MODEL.to_string(),
        prompt,
        temperature: 0.9,
        max_tokens: 150,
        top_p: 1.0,
        frequency_penalty: 0.0,
        presence_penalty: 0.6,
        stop,
        n,
    })
}

/// Build the chat payload from a [`ChatCompletionCall`], applying defaults
/// and clamping every tunable to the provider's legal range.
pub fn build_chat_request(call: &ChatCompletionCall) -> Result<ProviderChatRequest> {
    if call.messages.is_empty() || call.messages[0].content.trim().is_empty() {
        return Err(ServiceError::InvalidParams);
    }

    let model = if call.model.is_empty() {
        DEFAULT_CHAT_MODEL.to_string()
    } else {
        call.model.clone()
    };

    // Opaque per-caller tag for provider-side attribution
    let user = if call.user_id > 0 {
        format!("client_user_{}", call.user_id)
    } else {
        String::new()
    };

    let n = call.n.clamp(1, 5);

    let max_tokens = match call.max_tokens {
        0 => 200,
        t => t.min(MAX_TOKENS_CEILING),
    };

    let mut temperature = call.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        temperature = 0.9;
    }

    // Temperature and top-p are mutually exclusive controls: a positive
    // top-p neutralizes temperature, and at least one of the two must stay
    // enabled.
    let mut top_p = call.top_p;
    if top_p < 0.0 {
        // negative top-p is meaningless; treat it as unset
        top_p = 0.0;
    }
    if top_p > 0.0 {
        temperature = 0.0;
        if top_p > 1.0 {
            top_p = 1.0;
        }
    }
    if temperature == 0.0 && top_p == 0.0 {
        top_p = 1.0;
    }

    let frequency_penalty = if (-2.0..=2.0).contains(&call.frequency_penalty) {
        call.frequency_penalty
    } else {
        0.0
    };

    let presence_penalty = if (-2.0..=2.0).contains(&call.presence_penalty) {
        call.presence_penalty
    } else {
        0.6
    };

    Ok(ProviderChatRequest {
        model,
        messages: call.messages.clone(),
        temperature,
        top_p,
        n,
        stream: false,
        stop: call.stop.clone(),
        max_tokens,
        frequency_penalty,
        presence_penalty,
        user,
    })
}
