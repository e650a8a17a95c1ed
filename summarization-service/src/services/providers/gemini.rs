//! Gemini API gateway, authenticated with an API key.

use super::envelope::{read_response, GenerateContentRequest};
use super::{build_http_client, ModelGateway, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use service_core::observability::TracedClientExt;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: Option<String>,
}

pub struct GeminiGateway {
    config: GeminiConfig,
    endpoint: String,
    client: Client,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let base = config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/');
        let endpoint = format!("{}/v1beta/models/{}:generateContent", base, config.model);

        Ok(Self {
            config,
            endpoint,
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::user_prompt(prompt);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .traced_post(&self.endpoint)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        read_response(response).await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
