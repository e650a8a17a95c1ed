pub mod credentials;
pub mod metrics;
pub mod providers;

pub use credentials::{
    AccessToken, CachedTokenProvider, MetadataTokenProvider, StaticTokenProvider, TokenProvider,
};
pub use metrics::{get_metrics, init_metrics};
pub use providers::{
    GeminiConfig, GeminiGateway, MockGateway, ModelGateway, ProviderError, VertexConfig,
    VertexGateway,
};

use crate::config::{Backend, SummarizationConfig, TokenStrategy};
use std::sync::Arc;

/// Build the model gateway selected by `GENAI_BACKEND`.
pub fn build_gateway(config: &SummarizationConfig) -> Result<Arc<dyn ModelGateway>, ProviderError> {
    let gateway: Arc<dyn ModelGateway> = match config.model.backend {
        Backend::Vertex => {
            let tokens = build_token_provider(config)?;
            tracing::info!(
                project = %config.model.project,
                region = %config.model.region,
                model = %config.model.model,
                token_provider = tokens.name(),
                "Initialized Vertex AI gateway"
            );
            Arc::new(VertexGateway::new(
                VertexConfig {
                    project: config.model.project.clone(),
                    region: config.model.region.clone(),
                    model: config.model.model.clone(),
                    base_url: config.model.api_base.clone(),
                },
                tokens,
            )?)
        }
        Backend::Gemini => {
            tracing::info!(model = %config.model.model, "Initialized Gemini API gateway");
            Arc::new(GeminiGateway::new(GeminiConfig {
                api_key: config.credentials.api_key.clone(),
                model: config.model.model.clone(),
                base_url: config.model.api_base.clone(),
            })?)
        }
        Backend::Mock => {
            tracing::warn!("Using mock model gateway, prompts are not sent anywhere");
            Arc::new(MockGateway::echo())
        }
    };

    Ok(gateway)
}

fn build_token_provider(
    config: &SummarizationConfig,
) -> Result<Arc<dyn TokenProvider>, ProviderError> {
    let credentials = &config.credentials;
    let provider: Arc<dyn TokenProvider> = match credentials.token_strategy {
        TokenStrategy::Static => Arc::new(StaticTokenProvider::new(
            credentials.access_token.clone(),
        )),
        TokenStrategy::Metadata => Arc::new(MetadataTokenProvider::new(
            &credentials.metadata_server_url,
        )?),
        TokenStrategy::Cached => Arc::new(CachedTokenProvider::new(Arc::new(
            MetadataTokenProvider::new(&credentials.metadata_server_url)?,
        ))),
    };

    Ok(provider)
}
