//! Business logic services for the chat gateway.
//!
//! Credential pool management and the request orchestration layer.

pub mod chat_service;
pub mod credential_pool;

// Re-export commonly used types
pub use chat_service::ChatService;
pub use credential_pool::{Credential, CredentialPool};
