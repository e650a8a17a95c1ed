use service_core::observability::init_tracing;
use summarization_service::config::SummarizationConfig;
use summarization_service::services::init_metrics;
use summarization_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").unwrap_or_default();
    init_tracing("summarization-service", "info", &otlp_endpoint);

    init_metrics();

    let config = SummarizationConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
