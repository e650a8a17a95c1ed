use super::run_generation;
use crate::middleware::Authorized;
use crate::models::{QuerySuggestionsRequest, SuggestionsResponse};
use crate::prompts;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// `POST /generateQuerySuggestions`: follow-up questions for the dashboard.
///
/// The model's text goes back untouched; the extension parses the JSON array
/// itself.
#[tracing::instrument(skip_all)]
pub async fn generate_query_suggestions(
    State(state): State<AppState>,
    Authorized(request): Authorized<QuerySuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let prompt = prompts::query_suggestions_prompt(
        &request.query_results,
        &request.query_summaries,
        &request.next_steps_instructions,
    );

    let suggestions = run_generation(&state, "generateQuerySuggestions", &prompt).await?;

    Ok(Json(SuggestionsResponse { suggestions }))
}
