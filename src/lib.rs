//! Content aggregation service.
//!
//! Exposes HTTP endpoints that pull web articles, YouTube videos, and Reddit
//! threads into normalized JSON documents for downstream consumption (e.g.,
//! an LLM summarizer).

pub mod api;
pub mod article;
pub mod config;
pub mod llm;
pub mod reddit;
pub mod sanitize;
pub mod youtube;

// Re-export main types for easy access
pub use crate::api::{build_router, start_http_server, AppState};
pub use crate::article::{ArticleReport, ArticleScraper, ExtractionError};
pub use crate::config::Config;
pub use crate::llm::{GeminiSummarizer, Summarizer};
pub use crate::reddit::{RedditComment, RedditPost, RedditReply, RedditScraper};
pub use crate::sanitize::clean_identifier;
pub use crate::youtube::{VideoReport, VideoScrapeResult, YouTubeScraper};
