//! Chat gateway — a thin HTTP gateway in front of an LLM provider.
//!
//! Accepts simplified chat requests from internal clients, translates them
//! into the provider's wire format, forwards them over HTTPS, and normalizes
//! the provider's response back into a client-facing shape.
//!
//! - **Credential pool**: a fixed set of API keys, each bound to a dedicated
//!   HTTP client with its own connection pool; callers map deterministically
//!   onto credentials.
//! - **Request normalization**: every tunable parameter is defaulted and
//!   clamped to the provider's legal ranges before transmission; blank
//!   messages are rejected without a network call.
//! - **Continuation protocol**: length-truncated completions are resumed by
//!   re-issuing the request with the partial answer appended, up to a
//!   configurable bound, concatenating results until the model reports true
//!   completion.
//!
//! # Architecture
//!
//! - [`core`]: configuration, error taxonomy, request-scoped logging
//! - [`api`]: HTTP handlers, router, and inbound models
//! - [`provider`]: provider wire formats, normalizer, decoder, transport
//! - [`services`]: credential pool and request orchestration
//!
//! # Configuration
//!
//! Loaded once at startup from a YAML file (`CONFIG_PATH`, default
//! `config.yaml`), with environment overrides:
//! - `GATEWAY_API_KEYS`: comma-separated provider API keys (required; the
//!   process refuses to start with an empty pool)
//! - `GATEWAY_PROXY_URL`: optional outbound proxy
//! - `GATEWAY_API_BASE`: provider base URL
//! - `HOST` / `PORT`: server bind address (default 0.0.0.0:10100)
//! - `REQUEST_TIMEOUT_SECS`: outbound request timeout

pub mod api;
pub mod core;
pub mod provider;
pub mod services;

// Re-export commonly used types for convenience
pub use self::api::{build_router, ApiResponse, AppState, ChatCompletionCall, ChatRequest};
pub use self::core::{GatewayConfig, Result, ServiceError};
pub use self::services::{ChatService, CredentialPool};
