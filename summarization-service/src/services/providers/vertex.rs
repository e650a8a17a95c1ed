//! Vertex AI gateway.
//!
//! Calls `generateContent` on the regional Vertex AI endpoint with a bearer
//! token from a [`TokenProvider`].

use super::envelope::{read_response, GenerateContentRequest};
use super::{build_http_client, ModelGateway, ProviderError};
use crate::services::credentials::TokenProvider;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use service_core::observability::TracedClientExt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project: String,
    pub region: String,
    pub model: String,
    /// Defaults to `https://{region}-aiplatform.googleapis.com`.
    pub base_url: Option<String>,
}

impl VertexConfig {
    fn endpoint(&self) -> String {
        let base = match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.region),
        };
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base, self.project, self.region, self.model
        )
    }
}

pub struct VertexGateway {
    config: VertexConfig,
    endpoint: String,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl VertexGateway {
    pub fn new(config: VertexConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ProviderError> {
        if config.project.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Vertex AI project not configured".to_string(),
            ));
        }

        Ok(Self {
            endpoint: config.endpoint(),
            config,
            client: build_http_client()?,
            tokens,
        })
    }
}

#[async_trait]
impl ModelGateway for VertexGateway {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.tokens.access_token().await?;
        let request = GenerateContentRequest::user_prompt(prompt);

        tracing::debug!(
            model = %self.config.model,
            region = %self.config.region,
            token_provider = self.tokens.name(),
            prompt_len = prompt.len(),
            "Sending request to Vertex AI"
        );

        let response = self
            .client
            .traced_post(&self.endpoint)
            .bearer_auth(token.secret().expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        read_response(response).await
    }

    fn name(&self) -> &'static str {
        "vertex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::credentials::{AccessToken, StaticTokenProvider};
    use secrecy::Secret;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str =
        "/v1/projects/looker-proj/locations/us-central1/publishers/google/models/gemini-1.5-flash:generateContent";

    fn gateway(server: &MockServer, tokens: Arc<dyn TokenProvider>) -> VertexGateway {
        VertexGateway::new(
            VertexConfig {
                project: "looker-proj".to_string(),
                region: "us-central1".to_string(),
                model: "gemini-1.5-flash".to_string(),
                base_url: Some(server.uri()),
            },
            tokens,
        )
        .unwrap()
    }

    fn static_tokens() -> Arc<dyn TokenProvider> {
        Arc::new(StaticTokenProvider::new(Secret::new("ya29.test".to_string())))
    }

    #[test]
    fn default_endpoint_is_regional() {
        let config = VertexConfig {
            project: "p".to_string(),
            region: "europe-west4".to_string(),
            model: "m".to_string(),
            base_url: None,
        };

        assert_eq!(
            config.endpoint(),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/p/locations/europe-west4/publishers/google/models/m:generateContent"
        );
    }

    #[test]
    fn missing_project_is_rejected() {
        let result = VertexGateway::new(
            VertexConfig {
                project: String::new(),
                region: "us-central1".to_string(),
                model: "m".to_string(),
                base_url: None,
            },
            static_tokens(),
        );

        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn sends_prompt_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("authorization", "Bearer ya29.test"))
            .and(body_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Summarize this" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "## Web Traffic" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server, static_tokens())
            .generate("Summarize this")
            .await
            .unwrap();

        assert_eq!(text, "## Web Traffic");
    }

    #[tokio::test]
    async fn no_candidates_yields_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let text = gateway(&server, static_tokens()).generate("p").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn upstream_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Quota exceeded"))
            .mount(&server)
            .await;

        let err = gateway(&server, static_tokens())
            .generate("p")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::UpstreamStatus { status: 429, ref body } if body == "Quota exceeded"
        ));
    }

    #[tokio::test]
    async fn token_failure_skips_the_upstream_call() {
        struct FailingTokens;

        #[async_trait]
        impl TokenProvider for FailingTokens {
            async fn access_token(&self) -> Result<AccessToken, ProviderError> {
                Err(ProviderError::Credentials("no identity".to_string()))
            }

            fn name(&self) -> &'static str {
                "failing"
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = gateway(&server, Arc::new(FailingTokens))
            .generate("p")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Credentials(_)));
    }
}
