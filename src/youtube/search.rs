//! Keyword search over the video platform, ranked by view count.

use std::cmp::Reverse;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metadata::MetadataResolver;

const SEARCH_RESULT_LIMIT: usize = 50;
const RANKED_RESULT_LIMIT: usize = 5;

/// One ranked search result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct FlatSearchDump {
    #[serde(default)]
    entries: Vec<FlatEntry>,
}

/// Lightweight entry from a flat (no per-video fetch) search dump.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FlatEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
}

/// Search for up to 50 results in flat mode and keep the 5 most viewed.
pub async fn search_videos(resolver: &MetadataResolver, query: &str) -> Result<Vec<SearchHit>> {
    let target = format!("ytsearch{}:{}", SEARCH_RESULT_LIMIT, query);
    let stdout = resolver
        .dump_json(&[
            "--dump-single-json",
            "--flat-playlist",
            "--no-warnings",
            target.as_str(),
        ])
        .await?;
    let dump: FlatSearchDump = serde_json::from_str(&stdout)?;
    debug!(query, results = dump.entries.len(), "flat search completed");
    Ok(rank_by_views(dump.entries))
}

/// Stable sort by view count descending; ties keep search-result order.
/// Missing counts rank as zero.
pub(crate) fn rank_by_views(mut entries: Vec<FlatEntry>) -> Vec<SearchHit> {
    entries.sort_by_key(|entry| Reverse(entry.view_count.unwrap_or(0)));
    entries
        .into_iter()
        .take(RANKED_RESULT_LIMIT)
        .map(|entry| SearchHit {
            title: entry.title.unwrap_or_else(|| "Unknown".to_string()),
            url: entry.url.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, views: Option<u64>) -> FlatEntry {
        FlatEntry {
            title: Some(title.to_string()),
            url: Some(format!("https://example.com/{title}")),
            view_count: views,
        }
    }

    #[test]
    fn ranks_by_views_descending_with_stable_ties() {
        let entries = vec![
            entry("a", Some(100)),
            entry("b", Some(300)),
            entry("c", Some(300)),
            entry("d", Some(50)),
            entry("e", Some(200)),
        ];
        let ranked = rank_by_views(entries);
        let titles: Vec<&str> = ranked.iter().map(|hit| hit.title.as_str()).collect();
        // The two 300-view entries keep their original relative order.
        assert_eq!(titles, vec!["b", "c", "e", "a", "d"]);
    }

    #[test]
    fn truncates_to_five() {
        let entries = (0..8).map(|i| entry(&format!("v{i}"), Some(i))).collect();
        assert_eq!(rank_by_views(entries).len(), 5);
    }

    #[test]
    fn missing_view_count_ranks_last() {
        let entries = vec![entry("unknown", None), entry("small", Some(1))];
        let ranked = rank_by_views(entries);
        assert_eq!(ranked[0].title, "small");
        assert_eq!(ranked[1].title, "unknown");
    }

    #[test]
    fn missing_title_and_url_get_defaults() {
        let entries = vec![FlatEntry {
            title: None,
            url: None,
            view_count: Some(10),
        }];
        let ranked = rank_by_views(entries);
        assert_eq!(ranked[0].title, "Unknown");
        assert_eq!(ranked[0].url, "");
    }

    #[test]
    fn flat_dump_without_entries_parses_empty() {
        let dump: FlatSearchDump = serde_json::from_str(r#"{"id": "ytsearch"}"#).unwrap();
        assert!(dump.entries.is_empty());
    }
}
