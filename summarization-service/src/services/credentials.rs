//! Bearer tokens for the Vertex AI gateway.
//!
//! [`MetadataTokenProvider`] fetches a fresh token from the metadata server on
//! every call. [`CachedTokenProvider`] wraps any provider and reuses its token
//! until shortly before expiry. [`StaticTokenProvider`] hands out a fixed
//! token for local runs.

use super::providers::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Scope for calling Vertex AI.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens this close to expiry are refreshed before use.
const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// A bearer token and, when known, when it stops being valid.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: Secret<String>,
    expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<Duration>) -> Self {
        Self {
            value: Secret::new(value.into()),
            expires_at: expires_in.map(|ttl| Instant::now() + ttl),
        }
    }

    pub fn secret(&self) -> &Secret<String> {
        &self.value
    }

    /// Tokens without an expiry never go stale.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + margin < expires_at,
            None => true,
        }
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken, ProviderError>;

    fn name(&self) -> &'static str;
}

pub struct StaticTokenProvider {
    token: Secret<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Secret<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, ProviderError> {
        if self.token.expose_secret().is_empty() {
            return Err(ProviderError::Credentials(
                "Static access token not configured".to_string(),
            ));
        }
        Ok(AccessToken::new(self.token.expose_secret().clone(), None))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Service-account tokens from the GCE / Cloud Run metadata server.
pub struct MetadataTokenProvider {
    token_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl MetadataTokenProvider {
    pub fn new(metadata_server_url: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            token_url: format!(
                "{}{}",
                metadata_server_url.trim_end_matches('/'),
                METADATA_TOKEN_PATH
            ),
            client,
        })
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, ProviderError> {
        let response = self
            .client
            .traced_get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", CLOUD_PLATFORM_SCOPE)])
            .send()
            .await
            .map_err(|e| {
                ProviderError::Credentials(format!("Failed to reach metadata server: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Credentials(format!(
                "Metadata server returned {}: {}",
                status, body
            )));
        }

        let token: MetadataTokenResponse = response.json().await.map_err(|e| {
            ProviderError::Credentials(format!("Failed to parse metadata token: {}", e))
        })?;

        tracing::debug!(expires_in = ?token.expires_in, "Fetched access token from metadata server");

        Ok(AccessToken::new(
            token.access_token,
            token.expires_in.map(Duration::from_secs),
        ))
    }

    fn name(&self) -> &'static str {
        "metadata"
    }
}

/// Reuses the inner provider's token until it is about to expire.
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    cached: RwLock<Option<AccessToken>>,
    refresh_margin: Duration,
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn TokenProvider>) -> Self {
        Self::with_refresh_margin(inner, DEFAULT_REFRESH_MARGIN)
    }

    pub fn with_refresh_margin(inner: Arc<dyn TokenProvider>, refresh_margin: Duration) -> Self {
        Self {
            inner,
            cached: RwLock::new(None),
            refresh_margin,
        }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, ProviderError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(self.refresh_margin)) {
                return Ok(token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(self.refresh_margin)) {
            return Ok(token.clone());
        }

        let token = self.inner.access_token().await?;
        tracing::debug!(provider = self.inner.name(), "Refreshed cached access token");
        *cached = Some(token.clone());
        Ok(token)
    }

    fn name(&self) -> &'static str {
        "cached"
    }
}
