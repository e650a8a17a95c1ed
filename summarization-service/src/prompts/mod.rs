//! Prompt templates for the three generation endpoints.
//!
//! Each builder is a pure function: the same request always renders the same
//! prompt. Caller text is spliced in as-is.

use crate::models::QueryDescriptor;
use serde_json::Value;

/// Per-tile summary, answered as a fixed-shape Markdown section.
pub fn query_summary_prompt(
    query: &QueryDescriptor,
    description: &str,
    next_steps_instructions: &str,
) -> String {
    let note = match query.note() {
        Some(note) => format!("Query Note: {note}\n"),
        None => String::new(),
    };

    format!(
        r#"You are a specialized answering assistant that summarizes a single query from a Looker dashboard and proposes operational next steps drawn from its data.

The dashboard is described as follows:
{description}

When writing next steps, follow these instructions:
{next_steps_instructions}

Query Details:
Query Title: {title}
{note}Query Fields: {fields}
Query Data: {data}

Write your answer in Markdown using exactly this structure and nothing else:

## {title}

A plain paragraph describing what the query measures and how it relates to the dashboard.

> A concise summary of the most important findings in the query data, citing concrete values.

## Next Steps
- An actionable next step grounded in the data.
- Another actionable next step grounded in the data.

---

Do not wrap the answer in a code block. Use the query title exactly as given for the heading."#,
        title = query.title,
        fields = query.query_body.fields,
        data = render_json(&query.query_data),
    )
}

/// Whole-dashboard report built from the per-tile summaries.
pub fn dashboard_summary_prompt(query_summaries: &[String], next_steps_instructions: &str) -> String {
    format!(
        r###"You are a specialized answering assistant that consolidates summaries of several Looker dashboard queries into a single report.

Query summaries:
{summaries}

Tips for writing next steps:
{next_steps_instructions}

Write one consolidated report in Markdown:
- Open with a short overview of what the dashboard shows as a whole.
- Highlight the most significant trends and outliers across the queries.
- Refer to concrete named entities (for example product names, regions, channels or campaigns) rather than row numbers or indices.
- Finish with a single "## Next Steps" section containing one bulleted list of 2 to 6 actionable recommendations.

Do not repeat each query summary verbatim and do not wrap the answer in a code block."###,
        summaries = query_summaries.join("\n"),
    )
}

/// Three follow-up queries, answered as a JSON array.
pub fn query_suggestions_prompt(
    query_results: &Value,
    query_summaries: &Value,
    next_steps_instructions: &str,
) -> String {
    format!(
        r#"You are a specialized assistant that proposes follow-up questions a user could ask of the data behind a Looker dashboard.

Query results:
{results}

Query summaries:
{summaries}

Tips for writing next steps:
{next_steps_instructions}

Suggest exactly three follow-up queries in natural language that would deepen the analysis above. Every suggestion must include an explicit date filter; when the context does not imply a date range, use "last 30 days".

Respond with only a JSON array of exactly three objects of the form:
[{{"querySuggestion": "<suggestion>"}}, {{"querySuggestion": "<suggestion>"}}, {{"querySuggestion": "<suggestion>"}}]

Do not include any text before or after the JSON array and do not wrap it in a code block."#,
        results = render_json(query_results),
        summaries = render_json(query_summaries),
    )
}

/// Compact JSON, matching what the extension posted.
fn render_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: its map keys are always strings.
    serde_json::to_string(value).unwrap_or_default()
}
