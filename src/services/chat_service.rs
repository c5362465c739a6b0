//! Chat orchestration: normalization, credential selection, transport, and
//! the continuation protocol for length-truncated completions.
//!
//! For one inbound request, continuation calls run strictly one at a time;
//! each re-issue depends on the content of the previous answer. The loop is
//! bounded so a misbehaving upstream that keeps reporting truncation cannot
//! spin forever.

use crate::api::models::{ChatCompletionCall, ChatReply, ChatRequest};
use crate::core::config::GatewayConfig;
use crate::core::error::{Result, ServiceError};
use crate::provider::client::ProviderClient;
use crate::provider::request::{build_chat_request, build_completion_request};
use crate::provider::response::{
    decode_chat_response, decode_completion_response, ChatCompletionResponse,
};
use crate::services::credential_pool::CredentialPool;
use std::sync::Arc;

/// Orchestrates one logical client request end to end.
#[derive(Clone)]
pub struct ChatService {
    pool: Arc<CredentialPool>,
    client: ProviderClient,
    max_continuations: u32,
}

impl ChatService {
    pub fn new(pool: Arc<CredentialPool>, api_base: &str, max_continuations: u32) -> Self {
        Self {
            pool,
            client: ProviderClient::new(api_base),
            max_continuations,
        }
    }

    /// Build a service from the gateway configuration and a constructed pool.
    pub fn from_config(config: &GatewayConfig, pool: Arc<CredentialPool>) -> Self {
        Self::new(pool, &config.api_base, config.max_continuations)
    }

    /// Number of credentials backing this service.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Legacy completion flavor: one provider call, no continuation.
    ///
    /// The reply carries the full conversation prompt with the completion
    /// appended, ready to be sent back on the caller's next turn.
    pub async fn send_msg(&self, req: ChatRequest) -> Result<ChatReply> {
        let payload = build_completion_request(&req)?;
        let credential = self.pool.for_user(req.user_id);

        let body = self.client.post_completions(credential, &payload).await?;
        let response = decode_completion_response(&body)?;

        let text = response
            .choices
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default();

        Ok(ChatReply {
            prompt: format!("{}{}", payload.prompt, text),
            message: text,
            role_ai: req.role_ai.trim().to_string(),
            role_asker: req.role_asker.trim().to_string(),
        })
    }

    /// Chat flavor with the continuation protocol.
    ///
    /// While the first choice reports it stopped only due to the length
    /// limit, the partial assistant message is appended to the conversation
    /// and the request re-issued. Successive completion contents are
    /// concatenated; usage counters are replaced by the most recent call's
    /// counters. A continuation call yielding no choices ends the loop and
    /// the accumulated result so far is returned best-effort.
    pub async fn send_chat_msg(&self, req: ChatCompletionCall) -> Result<ChatCompletionResponse> {
        let mut payload = build_chat_request(&req)?;
        let credential = self.pool.for_user(req.user_id);

        let body = self.client.post_chat(credential, &payload).await?;
        let mut result = decode_chat_response(&body)?;

        if result.choices.is_empty() {
            return Ok(result);
        }

        let mut attempts = 0u32;
        while result.choices[0].is_truncated() {
            if attempts >= self.max_continuations {
                tracing::warn!(
                    attempts,
                    "completion still truncated at continuation limit"
                );
                return Err(ServiceError::ContinuationLimit { attempts });
            }
            attempts += 1;

            tracing::debug!(attempt = attempts, "completion truncated, continuing");

            payload.messages.push(result.choices[0].message.clone());
            let body = self.client.post_chat(credential, &payload).await?;
            let next = decode_chat_response(&body)?;

            let Some(next_choice) = next.choices.into_iter().next() else {
                break;
            };

            result.choices[0].message.content += &next_choice.message.content;
            result.choices[0].finish_reason = next_choice.finish_reason;
            result.usage = next.usage;
        }

        Ok(result)
    }
}
