//! Provider wire formats and transport.
//!
//! Everything that speaks the upstream provider's dialect lives here: the
//! request normalizer, the response decoder, and the HTTP transport client.

pub mod client;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use client::ProviderClient;
pub use request::{build_chat_request, build_completion_request, CompletionRequest, ProviderChatRequest};
pub use response::{
    decode_chat_response, decode_completion_response, ChatChoice, ChatCompletionResponse,
    CompletionResponse, FinishReason, Usage,
};
