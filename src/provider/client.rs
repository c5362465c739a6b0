//! Transport client for the upstream provider API.
//!
//! Issues HTTPS POSTs carrying a normalized payload and a selected
//! credential, and hands back the raw response body. The body is always read
//! in full so the connection is drained and returned to the credential's
//! pool even when decoding later fails. Transport failures are reported
//! distinctly from provider-application errors, which only become visible
//! after the decoder runs.

use crate::core::error::{Result, ServiceError};
use crate::provider::request::{CompletionRequest, ProviderChatRequest};
use crate::services::credential_pool::Credential;
use serde::Serialize;
use std::error::Error;

const COMPLETIONS_PATH: &str = "/v1/completions";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Thin wrapper binding the provider base URL to the outbound call sites.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    api_base: String,
}

impl ProviderClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    /// POST a legacy completion payload, returning the raw response body.
    pub async fn post_completions(
        &self,
        credential: &Credential,
        payload: &CompletionRequest,
    ) -> Result<Vec<u8>> {
        self.post_json(credential, COMPLETIONS_PATH, payload).await
    }

    /// POST a chat completion payload, returning the raw response body.
    pub async fn post_chat(
        &self,
        credential: &Credential,
        payload: &ProviderChatRequest,
    ) -> Result<Vec<u8>> {
        self.post_json(credential, CHAT_COMPLETIONS_PATH, payload)
            .await
    }

    async fn post_json<T: Serialize>(
        &self,
        credential: &Credential,
        path: &str,
        payload: &T,
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.api_base, path);

        let response = credential
            .client()
            .post(&url)
            .header("Authorization", format!("Bearer {}", credential.api_key()))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    url = %url,
                    error = %e,
                    error_source = ?e.source(),
                    is_timeout = e.is_timeout(),
                    is_connect = e.is_connect(),
                    "request to provider failed"
                );
                ServiceError::Transport(e)
            })?;

        let status = response.status();

        // Read the whole body regardless of status so the connection is
        // released back to the pool; provider errors arrive as a JSON
        // envelope and are left for the decoder.
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(
                url = %url,
                status = %status,
                error = %e,
                "failed to read provider response body"
            );
            ServiceError::Transport(e)
        })?;

        tracing::debug!(
            url = %url,
            status = %status,
            body_len = body.len(),
            "provider request completed"
        );

        Ok(body.to_vec())
    }
}
