mod common;

use common::{test_config, TestApp, TEST_CLIENT_SECRET};
use serde_json::{json, Value};
use summarization_service::config::Backend;
use summarization_service::services::MockGateway;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query_summary_body() -> Value {
    json!({
        "client_secret": TEST_CLIENT_SECRET,
        "query": {
            "title": "Web Traffic",
            "note_text": "Excludes internal traffic",
            "queryBody": { "fields": ["source", "amount"] },
            "queryData": [{ "amount": 42 }]
        },
        "description": "Marketing funnel overview",
        "nextStepsInstructions": "Keep steps short"
    })
}

#[tokio::test]
async fn query_summary_returns_model_text() {
    let app = TestApp::spawn_with_gateway(MockGateway::replying("## Web Traffic")).await;

    let response = app
        .post_json("/generateQuerySummary", &query_summary_body())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "summary": "## Web Traffic" }));

    let prompts = app.mock().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Query Title: Web Traffic"));
    assert!(prompts[0].contains("Query Note: Excludes internal traffic"));
    assert!(prompts[0].contains("Query Fields: source, amount"));
    assert!(prompts[0].contains("Marketing funnel overview"));
    assert!(prompts[0].contains("Keep steps short"));
}

#[tokio::test]
async fn dashboard_summary_joins_summaries() {
    let app = TestApp::spawn_with_gateway(MockGateway::replying("Report")).await;

    let response = app
        .post_json(
            "/generateSummary",
            &json!({
                "client_secret": TEST_CLIENT_SECRET,
                "querySummaries": ["A", "B"],
                "nextStepsInstructions": "tips"
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["summary"], "Report");
    assert!(app.mock().prompts()[0].contains("A\nB"));
}

#[tokio::test]
async fn query_suggestions_return_raw_text() {
    let reply = r#"[{"querySuggestion": "Revenue by region for the last 30 days"}]"#;
    let app = TestApp::spawn_with_gateway(MockGateway::replying(reply)).await;

    let response = app
        .post_json(
            "/generateQuerySuggestions",
            &json!({
                "client_secret": TEST_CLIENT_SECRET,
                "queryResults": [{ "revenue": 10 }],
                "querySummaries": ["Revenue grew in EMEA"],
                "nextStepsInstructions": ""
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["suggestions"], reply);
    assert!(app.mock().prompts()[0].contains(r#"[{"revenue":10}]"#));
}

#[tokio::test]
async fn wrong_secret_is_forbidden_on_every_route() {
    let app = TestApp::spawn().await;

    for route in [
        "/generateQuerySummary",
        "/generateSummary",
        "/generateQuerySuggestions",
    ] {
        let response = app
            .post_json(route, &json!({ "client_secret": "wrong" }))
            .await;

        assert_eq!(response.status(), 403, "route {}", route);
        assert_eq!(response.text().await.unwrap(), "Forbidden");
    }

    assert_eq!(app.mock().call_count(), 0);
}

#[tokio::test]
async fn missing_secret_is_forbidden_even_for_valid_payload() {
    let app = TestApp::spawn().await;

    let mut body = query_summary_body();
    body.as_object_mut().unwrap().remove("client_secret");

    let response = app.post_json("/generateQuerySummary", &body).await;

    assert_eq!(response.status(), 403);
    assert_eq!(app.mock().call_count(), 0);
}

#[tokio::test]
async fn malformed_body_without_secret_is_forbidden() {
    let app = TestApp::spawn().await;

    let response = app.post_raw("/generateSummary", "{not json").await;

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn missing_fields_are_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/generateQuerySummary",
            &json!({ "client_secret": TEST_CLIENT_SECRET, "description": "d" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
    assert_eq!(app.mock().call_count(), 0);
}

#[tokio::test]
async fn empty_summary_list_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/generateSummary",
            &json!({ "client_secret": TEST_CLIENT_SECRET, "querySummaries": [] }),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(app.mock().call_count(), 0);
}

#[tokio::test]
async fn empty_model_answer_is_returned_as_empty_summary() {
    let app = TestApp::spawn_with_gateway(MockGateway::replying("")).await;

    let response = app
        .post_json(
            "/generateSummary",
            &json!({ "client_secret": TEST_CLIENT_SECRET, "querySummaries": ["A"] }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["summary"], "");
}

#[tokio::test]
async fn gateway_failure_is_opaque_internal_error() {
    let app =
        TestApp::spawn_with_gateway(MockGateway::failing(429, "quota exhausted for project")).await;

    let response = app
        .post_json("/generateQuerySummary", &query_summary_body())
        .await;

    assert_eq!(response.status(), 500);
    let text = response.text().await.unwrap();
    assert_eq!(text, "Internal Server Error");
    assert!(!text.contains("quota"));
}

#[tokio::test]
async fn vertex_backend_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v1/projects/test-project/locations/us-central1/publishers/google/models/gemini-1.5-flash:generateContent",
        ))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Vertex summary" }] } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.model.backend = Backend::Vertex;
    config.model.api_base = Some(mock_server.uri());
    let app = TestApp::spawn_with_config(config).await;

    let response = app
        .post_json(
            "/generateSummary",
            &json!({ "client_secret": TEST_CLIENT_SECRET, "querySummaries": ["A"] }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["summary"], "Vertex summary");
}

#[tokio::test]
async fn vertex_logical_error_is_internal_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 400, "message": "secret upstream detail" }
        })))
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.model.backend = Backend::Vertex;
    config.model.api_base = Some(mock_server.uri());
    let app = TestApp::spawn_with_config(config).await;

    let response = app
        .post_json(
            "/generateSummary",
            &json!({ "client_secret": TEST_CLIENT_SECRET, "querySummaries": ["A"] }),
        )
        .await;

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal Server Error");
}
