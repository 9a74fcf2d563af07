//! Article extraction: download, structural parse, summary, and keywords.
//!
//! Unlike the video and reddit scrapers this module does not degrade to
//! partial data; a page that cannot be downloaded or yields no readable
//! text is an [`ExtractionError`] for the handler to surface.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::sanitize::clean_identifier;

/// Paragraphs shorter than this are treated as navigation chrome.
const MIN_PARAGRAPH_CHARS: usize = 40;
const SUMMARY_SENTENCES: usize = 3;
const KEYWORD_LIMIT: usize = 10;
const MIN_KEYWORD_CHARS: usize = 4;

static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][a-z'-]+").unwrap());

/// Frequent words that carry no topical signal, beyond the length cutoff.
const STOPWORDS: &[&str] = &[
    "about", "after", "again", "against", "also", "because", "been", "before", "being",
    "between", "both", "could", "does", "doing", "down", "during", "each", "from", "further",
    "have", "having", "here", "into", "itself", "just", "more", "most", "only", "other",
    "over", "same", "should", "some", "such", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "under", "until", "very", "were",
    "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid article URL: {0}")]
    InvalidUrl(String),

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("no readable content found at {0}")]
    NoContent(String),
}

/// Distilled article, ready for downstream consumption.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleReport {
    pub title: String,
    pub text: String,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Article downloader and distiller.
pub struct ArticleScraper {
    client: Client,
}

impl ArticleScraper {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .user_agent(config.http.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Download and distill a single article.
    pub async fn scrape(&self, raw_url: &str) -> Result<ArticleReport, ExtractionError> {
        let url = clean_identifier(raw_url);
        info!(%url, "scraping article");

        let parsed =
            Url::parse(&url).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ExtractionError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let response = self.client.get(parsed).send().await?;
        if !response.status().is_success() {
            return Err(ExtractionError::UpstreamStatus(response.status()));
        }
        let html = response.text().await?;

        let (title, text) = extract_content(&html);
        if text.is_empty() {
            return Err(ExtractionError::NoContent(url));
        }

        let keywords = top_keywords(&text, KEYWORD_LIMIT);
        let summary = summarize(&text, &keywords, SUMMARY_SENTENCES);
        debug!(%title, bytes = text.len(), "article distilled");

        Ok(ArticleReport {
            title,
            text,
            summary,
            keywords,
        })
    }
}

/// Pull the headline and paragraph text out of the document.
fn extract_content(html: &str) -> (String, String) {
    let document = Html::parse_document(html);

    let title = ["h1", "title"]
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .find_map(|sel| {
            document
                .select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default();

    // Article-scoped paragraphs first; the whole page as a fallback.
    let mut paragraphs = collect_paragraphs(&document, "article p");
    if paragraphs.is_empty() {
        paragraphs = collect_paragraphs(&document, "p");
    }

    (title, paragraphs.join("\n\n"))
}

fn collect_paragraphs(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| {
            el.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| text.len() >= MIN_PARAGRAPH_CHARS)
        .collect()
}

/// Most frequent non-stopword terms, most frequent first; ties break
/// alphabetically so the result is deterministic.
fn top_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in WORD.find_iter(&lowered) {
        let word = word.as_str();
        if word.len() < MIN_KEYWORD_CHARS || STOPWORDS.contains(&word) {
            continue;
        }
        *counts.entry(word).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Frequency-scored extractive summary: the highest-scoring sentences,
/// emitted in document order.
fn summarize(text: &str, keywords: &[String], limit: usize) -> String {
    let sentences: Vec<&str> = SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| s.split_whitespace().count() >= 5)
        .collect();
    if sentences.is_empty() {
        return String::new();
    }

    let mut scored: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let lowered = sentence.to_lowercase();
            let score = keywords
                .iter()
                .filter(|keyword| lowered.contains(keyword.as_str()))
                .count();
            (index, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut picked: Vec<usize> = scored.into_iter().take(limit).map(|(index, _)| index).collect();
    picked.sort_unstable();
    picked
        .iter()
        .map(|&index| sentences[index])
        .collect::<Vec<_>>()
        .join(" ")
}
