//! Configuration management for the chat gateway.
//!
//! Configuration is read once at startup from a YAML file, with support for
//! environment variable expansion and a small set of environment overrides.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Main gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Comma-separated list of provider API keys
    pub api_keys: String,

    /// Optional outbound HTTP proxy URL for provider traffic
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Base URL of the provider API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound connection pool tuning
    #[serde(default)]
    pub pool: PoolConfig,

    /// Upper bound on continuation calls for a single truncated completion
    #[serde(default = "default_max_continuations")]
    pub max_continuations: u32,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Connection pool tuning for the per-credential HTTP clients.
///
/// The bounds keep socket growth under load in check and keep provider
/// latency from bleeding into caller latency past the request timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum idle connections kept per host
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,

    /// How long an idle connection is kept before being closed, in seconds
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Overall request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: default_max_idle_per_host(),
            idle_timeout_secs: default_idle_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PoolConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10100
}

fn default_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_max_idle_per_host() -> usize {
    50
}

fn default_idle_timeout_secs() -> u64 {
    // 20 minutes
    1200
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_continuations() -> u32 {
    5
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    ///
    /// Environment variables referenced as `${VAR}` or `${VAR:-default}` in
    /// the file are expanded first; a handful of well-known environment
    /// variables then override the file values.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let expanded = expand_env_vars(&content);

        let mut config: GatewayConfig = serde_yaml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (env vars take precedence).
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(keys) = std::env::var("GATEWAY_API_KEYS") {
            self.api_keys = keys;
        }
        if let Ok(proxy) = std::env::var("GATEWAY_PROXY_URL") {
            if proxy.is_empty() {
                self.proxy_url = None;
            } else {
                self.proxy_url = Some(proxy);
            }
        }
        if let Ok(base) = std::env::var("GATEWAY_API_BASE") {
            self.api_base = base;
        }
        if let Ok(timeout_str) = std::env::var("REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                self.pool.request_timeout_secs = timeout;
            }
        }
    }

    /// Split the comma-separated key list, dropping blank entries.
    pub fn api_key_list(&self) -> Vec<String> {
        self.api_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Expand environment variables in configuration content.
///
/// Supports patterns: ${VAR}, ${VAR:-default}, ${VAR:default}
fn expand_env_vars(content: &str) -> String {
    let re = Regex::new(r#"["']?\$\{([^}:]+)(?::?-?([^}]*))?\}["']?"#).unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default_value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var_name).unwrap_or_else(|_| default_value.to_string())
    })
    .to_string()
}
