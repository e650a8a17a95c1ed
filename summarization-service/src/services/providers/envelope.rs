//! `generateContent` request/response bodies, shared by Vertex AI and the
//! Gemini API.

use super::ProviderError;
use serde::{Deserialize, Serialize};

/// Upstream bodies echoed into errors are cut to this many bytes.
const MAX_ERROR_BODY_BYTES: usize = 2048;

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// `{"contents":[{"role":"user","parts":[{"text": prompt}]}]}`
    pub fn user_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

/// Every level is optional: a missing segment yields an empty answer, not an
/// error.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, or `""`.
    pub fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default()
    }
}

/// Turn an upstream HTTP response into the answer text.
pub async fn read_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(format!("Failed to read response body: {}", e)))?;

    parse_response(status.as_u16(), &body)
}

fn parse_response(status: u16, body: &str) -> Result<String, ProviderError> {
    if !(200..300).contains(&status) {
        return Err(ProviderError::UpstreamStatus {
            status,
            body: truncate(body, MAX_ERROR_BODY_BYTES).to_string(),
        });
    }

    let decoded: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = decoded.error {
        return Err(ProviderError::UpstreamLogical(format!(
            "{} ({})",
            error.message,
            error
                .status
                .or_else(|| error.code.map(|c| c.to_string()))
                .unwrap_or_else(|| "unknown".to_string())
        )));
    }

    if decoded.candidates.is_empty() {
        tracing::warn!("Upstream response had no candidates, answering with empty text");
    }

    Ok(decoded.first_text())
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_shape() {
        let body = serde_json::to_value(GenerateContentRequest::user_prompt("hello")).unwrap();
        assert_eq!(
            body,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn extracts_first_candidate_first_part() {
        let body = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        })
        .to_string();

        assert_eq!(parse_response(200, &body).unwrap(), "first");
    }

    #[test]
    fn missing_segments_yield_empty_text() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }] }),
        ] {
            assert_eq!(parse_response(200, &body.to_string()).unwrap(), "");
        }
    }

    #[test]
    fn non_success_status_is_an_error() {
        let err = parse_response(503, "backend unavailable").unwrap_err();
        match err {
            ProviderError::UpstreamStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "backend unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_field_on_success_is_an_error() {
        let body = json!({
            "error": { "code": 400, "message": "Request contains an invalid argument.", "status": "INVALID_ARGUMENT" }
        })
        .to_string();

        let err = parse_response(200, &body).unwrap_err();
        assert!(matches!(err, ProviderError::UpstreamLogical(ref m) if m.contains("INVALID_ARGUMENT")));
    }

    #[test]
    fn undecodable_body_is_an_error() {
        let err = parse_response(200, "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "é".repeat(MAX_ERROR_BODY_BYTES);
        match parse_response(500, &body).unwrap_err() {
            ProviderError::UpstreamStatus { body, .. } => {
                assert!(body.len() <= MAX_ERROR_BODY_BYTES)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
