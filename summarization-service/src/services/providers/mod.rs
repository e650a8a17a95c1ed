//! Model gateway abstraction and implementations.
//!
//! Prompt building and routing talk to a single [`ModelGateway`]; which
//! upstream answers (Vertex AI, Gemini API, or the in-process mock) is a
//! startup decision.

pub mod envelope;
pub mod gemini;
pub mod mock;
pub mod vertex;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiGateway};
pub use mock::MockGateway;
pub use vertex::{VertexConfig, VertexGateway};

/// Error type for gateway and credential operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream error: {0}")]
    UpstreamLogical(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Credentials(_) => "credentials",
            ProviderError::Network(_) => "network",
            ProviderError::UpstreamStatus { .. } => "upstream_status",
            ProviderError::UpstreamLogical(_) => "upstream_logical",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Sends one prompt as a user turn and returns the model's text.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// One round trip, no retries.
    ///
    /// Returns the first candidate's first text part, or an empty string when
    /// the upstream answered successfully without one.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Backend label for logs and metrics.
    fn name(&self) -> &'static str;
}

/// Shared by the HTTP gateways: no request timeout, the upstream decides.
pub(crate) fn build_http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(concat!("summarization-service/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}
