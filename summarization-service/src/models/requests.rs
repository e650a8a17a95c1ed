//! Request and response bodies of the generation endpoints.
//!
//! Every request also carries `client_secret`; it is checked from the raw
//! body before these types are decoded and is ignored here.

use super::QueryDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// `POST /generateQuerySummary`
#[derive(Debug, Deserialize, Validate)]
pub struct QuerySummaryRequest {
    #[validate(nested)]
    pub query: QueryDescriptor,
    /// Dashboard description; dashboards without one send nothing.
    #[serde(default)]
    pub description: String,
    #[serde(rename = "nextStepsInstructions", default)]
    pub next_steps_instructions: String,
}

/// `POST /generateSummary`
#[derive(Debug, Deserialize, Validate)]
pub struct DashboardSummaryRequest {
    #[serde(rename = "querySummaries")]
    #[validate(length(min = 1, message = "querySummaries must not be empty"))]
    pub query_summaries: Vec<String>,
    #[serde(rename = "nextStepsInstructions", default)]
    pub next_steps_instructions: String,
}

/// `POST /generateQuerySuggestions`
#[derive(Debug, Deserialize, Validate)]
pub struct QuerySuggestionsRequest {
    #[serde(rename = "queryResults")]
    pub query_results: Value,
    #[serde(rename = "querySummaries")]
    pub query_summaries: Value,
    #[serde(rename = "nextStepsInstructions", default)]
    pub next_steps_instructions: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// `suggestions` holds the model's text, expected to be a JSON array.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: String,
}
