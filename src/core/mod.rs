//! Core functionality for the chat gateway.
//!
//! This module contains fundamental components used throughout the
//! application: configuration, error handling, and logging context.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{GatewayConfig, PoolConfig, ServerConfig};
pub use error::{Result, ServiceError};
pub use logging::{generate_request_id, get_request_id, REQUEST_ID};
