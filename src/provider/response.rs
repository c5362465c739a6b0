//! Provider wire-format responses and the response decoder.
//!
//! The decoder distinguishes two failure modes: a well-formed body carrying
//! a populated provider error message (a provider-application error,
//! surfaced verbatim) and a body that fails structural parsing (a decode
//! error, logged with the raw bytes). A well-formed response with zero
//! choices is terminal for the call but is not an error.

use crate::api::models::ChatMessage;
use crate::core::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Why the provider stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Stopped only because the output token limit was reached
    Length,
    /// Anything else the provider reports
    #[serde(other)]
    Other,
}

/// Token usage counters reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Provider-reported application error payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub message: String,
}

/// A single chat completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

impl ChatChoice {
    /// True when the provider stopped purely due to the length limit.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
    }
}

/// Chat completion response envelope (`/v1/chat/completions`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderErrorBody>,
}

/// A single legacy completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Legacy completion response envelope (`/v1/completions`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderErrorBody>,
}

/// Decode a chat completion body, surfacing provider-application errors.
pub fn decode_chat_response(body: &[u8]) -> Result<ChatCompletionResponse> {
    let response: ChatCompletionResponse = parse(body)?;
    check_provider_error(response.error.as_ref(), body)?;
    Ok(response)
}

/// Decode a legacy completion body, surfacing provider-application errors.
pub fn decode_completion_response(body: &[u8]) -> Result<CompletionResponse> {
    let response: CompletionResponse = parse(body)?;
    check_provider_error(response.error.as_ref(), body)?;
    Ok(response)
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %String::from_utf8_lossy(body),
            "provider response failed to decode"
        );
        ServiceError::Decode(e)
    })
}

fn check_provider_error(error: Option<&ProviderErrorBody>, body: &[u8]) -> Result<()> {
    if let Some(err) = error {
        if !err.message.is_empty() {
            tracing::error!(
                provider_error = %err.message,
                body = %String::from_utf8_lossy(body),
                "provider reported an application error"
            );
            return Err(ServiceError::Provider {
                message: err.message.clone(),
            });
        }
    }
    Ok(())
}
