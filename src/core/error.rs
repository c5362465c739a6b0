//! Error types and handling for the chat gateway.
//!
//! All request-path failures are expressed as [`ServiceError`], a tagged
//! taxonomy rather than a single flat code/message struct. Each variant maps
//! to a numeric envelope code and a client-facing message; transport and
//! decode details are never leaked to the caller.

use crate::api::models::ApiResponse;
use crate::core::logging::get_request_id;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Envelope code for a successful response.
pub const CODE_OK: u32 = 0;
/// Envelope code for malformed input or empty message content.
pub const CODE_PARAMS_INVALID: u32 = 1007;
/// Envelope code for any server-side failure.
pub const CODE_SYSTEM_ERROR: u32 = 500;

const MSG_PARAMS_INVALID: &str = "invalid parameters";
const MSG_SYSTEM_ERROR: &str = "server error, please retry later";

/// Unified error type for the gateway request path.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed inbound JSON or empty message content; never reaches the network
    #[error("invalid parameters")]
    InvalidParams,

    /// Network-level failure reaching the provider (DNS, connect, TLS, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider returned bytes that are not valid JSON in the expected shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Provider returned a well-formed application-level error payload
    #[error("provider error: {message}")]
    Provider { message: String },

    /// The continuation loop hit its configured upper bound
    #[error("completion still truncated after {attempts} continuation calls")]
    ContinuationLimit { attempts: u32 },
}

impl ServiceError {
    /// Numeric code carried in the response envelope.
    pub fn code(&self) -> u32 {
        match self {
            ServiceError::InvalidParams => CODE_PARAMS_INVALID,
            _ => CODE_SYSTEM_ERROR,
        }
    }

    /// Message surfaced to the caller.
    ///
    /// Provider-application messages are considered safe and pass through
    /// verbatim; transport and decode failures collapse to a generic message.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::InvalidParams => MSG_PARAMS_INVALID.to_string(),
            ServiceError::Transport(_) | ServiceError::Decode(_) => MSG_SYSTEM_ERROR.to_string(),
            ServiceError::Provider { message } => message.clone(),
            ServiceError::ContinuationLimit { .. } => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Errors ride the envelope over HTTP 200; internal clients dispatch
        // on the envelope code, not the HTTP status.
        let body: ApiResponse<()> =
            ApiResponse::err(self.code(), self.client_message(), get_request_id());
        Json(body).into_response()
    }
}

/// Convenience type alias for Results using [`ServiceError`].
pub type Result<T> = std::result::Result<T, ServiceError>;
