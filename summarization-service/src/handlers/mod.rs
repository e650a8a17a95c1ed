//! HTTP handlers for the summarization service.

pub mod health;
pub mod suggestions;
pub mod summary;

use crate::services::metrics;
use crate::startup::AppState;
use anyhow::anyhow;
use service_core::error::AppError;
use std::time::Instant;

/// Send a rendered prompt to the configured gateway.
///
/// Failures are logged here with full detail and surface to the caller only
/// as an opaque internal error.
pub(crate) async fn run_generation(
    state: &AppState,
    endpoint: &'static str,
    prompt: &str,
) -> Result<String, AppError> {
    let backend = state.gateway.name();
    metrics::record_prompt_size(endpoint, prompt.len());

    let start = Instant::now();
    let result = state.gateway.generate(prompt).await;
    let elapsed = start.elapsed();

    metrics::record_generation(endpoint, backend, result.is_ok(), elapsed.as_secs_f64());

    match result {
        Ok(text) => {
            tracing::info!(
                endpoint,
                backend,
                prompt_bytes = prompt.len(),
                response_bytes = text.len(),
                latency_ms = elapsed.as_millis() as u64,
                "Generation completed"
            );
            Ok(text)
        }
        Err(e) => {
            metrics::record_provider_error(backend, e.kind());
            tracing::warn!(
                endpoint,
                backend,
                error_type = e.kind(),
                latency_ms = elapsed.as_millis() as u64,
                "Generation failed"
            );
            Err(AppError::InternalError(anyhow!(
                "{} generation via {} failed: {}",
                endpoint,
                backend,
                e
            )))
        }
    }
}
