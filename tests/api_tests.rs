use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use content_aggregator::api::{build_router, AppState};
use content_aggregator::config::Config;
use content_aggregator::llm::GeminiSummarizer;
use content_aggregator::youtube::SHORTS_ADVISORY;

fn test_state() -> AppState {
    let config = Arc::new(Config::default());
    let summarizer = Arc::new(GeminiSummarizer::new(config.llm.clone()));
    AppState::new(config, summarizer)
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = build_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = build_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "content-aggregator");
}

#[tokio::test]
async fn missing_required_field_returns_400_with_error_key() {
    for uri in ["/yt/search", "/yt/scrape", "/reddit/scrape", "/article/scrape"] {
        let app = build_router(test_state());
        let response = app.oneshot(json_post(uri, "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
        let body = body_json(response).await;
        assert!(body.get("error").is_some(), "uri {uri}");
    }
}

#[tokio::test]
async fn wrong_field_type_is_also_a_400() {
    let app = build_router(test_state());
    let response = app
        .oneshot(json_post("/yt/scrape", r#"{"url": 42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shorts_url_returns_the_advisory_string() {
    let app = build_router(test_state());
    let response = app
        .oneshot(json_post(
            "/yt/scrape",
            r#"{"url": "https://www.youtube.com/shorts/abc123"}"#,
        ))
        .await
        .unwrap();

    // The advisory is a success, not an error, and serializes as a bare
    // JSON string rather than a report object.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::Value::String(SHORTS_ADVISORY.to_string()));
}

#[tokio::test]
async fn invalid_article_url_is_a_500_error_body() {
    let app = build_router(test_state());
    let response = app
        .oneshot(json_post("/article/scrape", r#"{"url": "not a url"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
}
