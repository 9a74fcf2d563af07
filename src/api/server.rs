//! HTTP server implementation for the API

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::article::ArticleScraper;
use crate::config::Config;
use crate::llm::Summarizer;
use crate::reddit::RedditScraper;
use crate::youtube::YouTubeScraper;

use super::handlers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub youtube: Arc<YouTubeScraper>,
    pub reddit: Arc<RedditScraper>,
    pub articles: Arc<ArticleScraper>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    /// Build the scrapers from configuration; the summarizer is handed in
    /// because it is constructed (and probed) once at process start.
    pub fn new(config: Arc<Config>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            youtube: Arc::new(YouTubeScraper::new(&config)),
            reddit: Arc::new(RedditScraper::new(&config)),
            articles: Arc::new(ArticleScraper::new(&config)),
            config,
            summarizer,
        }
    }
}

/// Build the application router with permissive CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/yt/search", post(handlers::yt_search))
        .route("/yt/scrape", post(handlers::yt_scrape))
        .route("/reddit/scrape", post(handlers::reddit_scrape))
        .route("/article/scrape", post(handlers::article_scrape))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Bind and serve until shutdown.
pub async fn start_http_server(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
