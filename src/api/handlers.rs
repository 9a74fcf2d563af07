//! Route handlers: payload validation, scraper dispatch, error mapping.
//!
//! Two failure tiers: a missing required field is a 400 with an `error`
//! body; an extractor failure is a 500, except video search, whose errors
//! ride back as a 200 `{"error": ...}` object to match the upstream
//! contract. Degraded-but-successful extractions are plain 200s.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use tracing::warn;

use super::models::{error_body, missing_field, WELCOME_MESSAGE};
use super::server::AppState;

/// `GET /`
pub async fn home() -> impl IntoResponse {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "content-aggregator",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /yt/search`
pub async fn yt_search(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(query) = payload.get("search_query").and_then(Value::as_str) else {
        return missing_field("No search query provided");
    };

    match state.youtube.search(query).await {
        Ok(hits) => (StatusCode::OK, Json(hits)).into_response(),
        Err(e) => {
            warn!(error = %e, "video search failed");
            (StatusCode::OK, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// `POST /yt/scrape`
pub async fn yt_scrape(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(url) = payload.get("url").and_then(Value::as_str) else {
        return missing_field("No URL provided");
    };

    match state.youtube.scrape_video(url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!(error = %e, "video scrape failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `POST /reddit/scrape`
pub async fn reddit_scrape(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(subreddit) = payload.get("subreddit").and_then(Value::as_str) else {
        return missing_field("No subreddit provided");
    };

    match state.reddit.scrape_subreddit(subreddit).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(e) => {
            warn!(error = %e, "subreddit scrape failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `POST /article/scrape`
pub async fn article_scrape(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(url) = payload.get("url").and_then(Value::as_str) else {
        return missing_field("No URL provided");
    };

    match state.articles.scrape(url).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            warn!(error = %e, "article scrape failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
