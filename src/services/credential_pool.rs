//! Credential pool: API keys bound to dedicated HTTP clients.
//!
//! Each configured API key owns a long-lived `reqwest::Client` with its own
//! connection pool. The pool is built once at startup, is immutable for the
//! process lifetime, and maps caller identities onto credentials with a
//! plain modulo, so concurrent reads need no synchronization and a given
//! caller always lands on the same credential for a fixed pool.

use crate::core::config::{GatewayConfig, PoolConfig};
use anyhow::{bail, Context, Result};
use std::time::Duration;

/// An API key paired 1:1 with its dedicated HTTP client.
#[derive(Debug, Clone)]
pub struct Credential {
    api_key: String,
    client: reqwest::Client,
}

impl Credential {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Fixed set of credentials, selected by caller identity.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    /// Build a pool from an explicit key list.
    ///
    /// Fails when the key list is empty or a client cannot be constructed;
    /// a process without credentials must not start.
    pub fn new(keys: Vec<String>, pool: &PoolConfig, proxy_url: Option<&str>) -> Result<Self> {
        if keys.is_empty() {
            bail!("no provider API keys configured");
        }

        let mut credentials = Vec::with_capacity(keys.len());
        for api_key in keys {
            let client = build_client(pool, proxy_url)
                .context("failed to build HTTP client for credential")?;
            credentials.push(Credential { api_key, client });
        }

        Ok(Self { credentials })
    }

    /// Build a pool straight from the gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::new(
            config.api_key_list(),
            &config.pool,
            config.proxy_url.as_deref(),
        )
    }

    /// Select the credential for a caller identity.
    ///
    /// Pure function of `user_id mod pool_size`; stable across calls for an
    /// unchanged pool. Euclidean remainder keeps negative identities in
    /// range.
    pub fn for_user(&self, user_id: i64) -> &Credential {
        let idx = user_id.rem_euclid(self.credentials.len() as i64) as usize;
        &self.credentials[idx]
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

fn build_client(pool: &PoolConfig, proxy_url: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(pool.max_idle_per_host)
        .pool_idle_timeout(pool.idle_timeout())
        .timeout(pool.request_timeout())
        .tcp_keepalive(Duration::from_secs(60));

    if let Some(proxy) = proxy_url {
        builder = builder.proxy(
            reqwest::Proxy::all(proxy).with_context(|| format!("invalid proxy URL: {}", proxy))?,
        );
    }

    Ok(builder.build()?)
}
