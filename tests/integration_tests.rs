//! Integration tests
//!
//! Test end-to-end functionality of the entire gateway

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use llm_comparator::config::{BackendConfig, CatalogConfig, Settings};
use llm_comparator::handlers::create_router;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Settings pointing at `backend_url` with no pause between models
fn create_test_settings(backend_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.backend = BackendConfig::with_base_url(backend_url);
    settings.comparison.request_delay_ms = 0;
    settings
}

async fn create_test_app(backend_url: &str) -> Router {
    create_router(create_test_settings(backend_url), CatalogConfig::default())
        .await
        .expect("Failed to create router")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = read_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "llm-comparator");
    assert!(health["version"].is_string());
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let request = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let live = read_json(response).await;
    assert_eq!(live["status"], "alive");
    assert!(live["details"]["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_unknown_route_returns_404_envelope() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let request = Request::builder().uri("/nowhere").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Route not found");
    assert!(body["message"].as_str().unwrap().contains("/nowhere"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/compare")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_models_endpoint() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let request = Request::builder().uri("/models").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["max_selection"], 3);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 7);
    assert_eq!(models[0]["name"], "Claude 3 Sonnet");
    assert_eq!(models[0]["pricing"]["output"], 0.015);
}

#[tokio::test]
async fn test_compare_rejects_invalid_requests() {
    let server = MockServer::start_async().await;
    let health = server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let cases = [
        json!({"question": "Hi", "models": ["A", "B", "C", "D"]}),
        json!({"question": "   ", "models": ["A"]}),
        json!({"question": "Hi", "models": []}),
        json!({"question": "Hi"}),
    ];

    for case in cases {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/compare", case.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", case);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Invalid request");
    }

    health.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_compare_end_to_end() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .json_body_partial(r#"{"model": "Claude 3 Haiku"}"#);
            then.status(200)
                .json_body(json!({"response": "**Yes** <b>really</b>", "has_internet": false}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .json_body_partial(r#"{"model": "Pixtral Large"}"#);
            then.status(500);
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/compare",
            json!({"question": "Is Rust fast?", "models": ["Claude 3 Haiku", "Pixtral Large"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["model"], "Claude 3 Haiku");
    assert_eq!(results[0]["response_text"], "**Yes** <b>really</b>");
    assert_eq!(
        results[0]["formatted_html"],
        "<p><strong>Yes</strong> &lt;b&gt;really&lt;/b&gt;</p>\n"
    );

    assert_eq!(results[1]["model"], "Pixtral Large");
    assert_eq!(results[1]["response_text"], "");
    assert!(results[1]["error_message"].as_str().unwrap().contains("500"));
    assert!(results[1].get("formatted_html").is_none());

    assert!(body["total_estimated_cost"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_query_forwarding() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .json_body(json!({"model": "Claude 3 Haiku", "question": "Quelle heure est-il ?"}));
            then.status(200)
                .json_body(json!({"response": "Il est midi.", "has_internet": false}));
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/query",
            json!({"model": "Claude 3 Haiku", "question": "Quelle heure est-il ?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["response"], "Il est midi.");
    assert_eq!(body["has_internet"], false);
}

#[tokio::test]
async fn test_query_forwarding_maps_backend_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(429);
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/query",
            json!({"model": "Claude 3 Haiku", "question": "Hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Backend error");
    assert_eq!(body["kind"], "rate_limited");
}

#[tokio::test]
async fn test_improve_prompt_degrades_when_backend_is_down() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/improve-prompt",
            json!({"prompt": "explain borrowing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["improved_prompt"], "explain borrowing");
}

#[tokio::test]
async fn test_chat_with_documents() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    let query = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .body_contains("=== DOCUMENT: notes.txt ===");
            then.status(200).json_body(json!({"response": "The sky is green."}));
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/chat",
            json!({
                "model": "Claude 3 Haiku",
                "message": "What color is the sky?",
                "documents": [
                    {"name": "notes.txt", "text": "In this world the sky is green."},
                    {"name": "scan.pdf", "error": "No text layer"}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["model"], "Claude 3 Haiku");
    assert_eq!(body["reply"]["role"], "assistant");
    assert_eq!(body["reply"]["content"], "The sky is green.");
    assert_eq!(body["grounded_documents"], 1);
    query.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_chat_accepts_large_documents() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    let query = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .body_contains("=== DOCUMENT: export.txt ===");
            then.status(200).json_body(json!({"response": "Read it."}));
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    // Well above axum's default 2 MB extractor limit
    let text = "a".repeat(3 * 1024 * 1024);
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/chat",
            json!({
                "message": "Summarize the export",
                "documents": [{"name": "export.txt", "text": text}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["reply"]["content"], "Read it.");
    assert_eq!(body["grounded_documents"], 1);
    query.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = create_test_app("http://127.0.0.1:1").await;

    let text = "a".repeat(11 * 1024 * 1024);
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/chat",
            json!({
                "message": "Hi",
                "documents": [{"name": "huge.txt", "text": text}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_chat_blank_document_is_not_counted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    let query = server
        .mock_async(|when, then| {
            when.method(POST).path("/query").json_body_partial(r#"{"question": "Hi"}"#);
            then.status(200).json_body(json!({"response": "Hello."}));
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/chat",
            json!({
                "model": "Claude 3 Haiku",
                "message": "Hi",
                "documents": [{"name": "empty.txt", "text": ""}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["grounded_documents"], 0);
    query.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_prompt_templates_and_optimize() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .json_body_partial(r#"{"model": "Claude 3.7 Sonnet"}"#);
            then.status(200).json_body(json!({"response": "An optimized prompt."}));
        })
        .await;
    let app = create_test_app(&server.base_url()).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/prompts/templates").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["templates"].as_array().unwrap().len(), 4);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/prompts/optimize",
            json!({"template_id": "analysis", "values": {"subject": "async Rust"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["optimized_prompt"], "An optimized prompt.");
    assert_eq!(body["model"], "Claude 3.7 Sonnet");
    assert!(body["original_prompt"].as_str().unwrap().contains("async Rust"));

    let response = app
        .oneshot(json_request(Method::POST, "/prompts/optimize", json!({"prompt": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
