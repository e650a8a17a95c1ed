use super::run_generation;
use crate::middleware::Authorized;
use crate::models::{DashboardSummaryRequest, QuerySummaryRequest, SummaryResponse};
use crate::prompts;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// `POST /generateQuerySummary`: summary of a single dashboard tile.
#[tracing::instrument(skip_all)]
pub async fn generate_query_summary(
    State(state): State<AppState>,
    Authorized(request): Authorized<QuerySummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    tracing::debug!(query_title = %request.query.title, "Summarizing query");

    let prompt = prompts::query_summary_prompt(
        &request.query,
        &request.description,
        &request.next_steps_instructions,
    );

    let summary = run_generation(&state, "generateQuerySummary", &prompt).await?;

    Ok(Json(SummaryResponse { summary }))
}

/// `POST /generateSummary`: consolidated report over the tile summaries.
#[tracing::instrument(skip_all)]
pub async fn generate_summary(
    State(state): State<AppState>,
    Authorized(request): Authorized<DashboardSummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    tracing::debug!(
        summaries = request.query_summaries.len(),
        "Summarizing dashboard"
    );

    let prompt = prompts::dashboard_summary_prompt(
        &request.query_summaries,
        &request.next_steps_instructions,
    );

    let summary = run_generation(&state, "generateSummary", &prompt).await?;

    Ok(Json(SummaryResponse { summary }))
}
