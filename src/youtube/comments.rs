//! Top-level comment retrieval via the public comment threads API.

use anyhow::{anyhow, Result};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

/// Fetch up to 50 top-level comments for a video, plain text.
///
/// The proxy behind the endpoint requires a fixed Referer header. Any
/// failure here is the caller's to absorb; the aggregator substitutes an
/// empty list.
pub async fn fetch_top_comments(
    client: &Client,
    api_url: &str,
    api_key: &str,
    referer: &str,
    video_id: &str,
) -> Result<Vec<String>> {
    if api_key.is_empty() {
        return Err(anyhow!("comments API key not configured"));
    }

    let response = client
        .get(api_url)
        .query(&[
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", "50"),
            ("textFormat", "plainText"),
            ("key", api_key),
        ])
        .header(header::REFERER, referer)
        .send()
        .await?;

    let body: Value = response.json().await?;
    let comments = comment_texts(&body);
    debug!(video_id, count = comments.len(), "fetched comment threads");
    Ok(comments)
}

/// Walk the comment-thread listing down to the display text of each
/// top-level comment. Missing structure yields an empty list.
fn comment_texts(body: &Value) -> Vec<String> {
    body.get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.pointer("/snippet/topLevelComment/snippet/textDisplay")
                        .and_then(Value::as_str)
                        .map(|text| text.trim().to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_and_trims_display_text() {
        let body = json!({
            "items": [
                {"snippet": {"topLevelComment": {"snippet": {"textDisplay": "  great video  "}}}},
                {"snippet": {"topLevelComment": {"snippet": {"textDisplay": "thanks"}}}}
            ]
        });
        assert_eq!(comment_texts(&body), vec!["great video", "thanks"]);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let body = json!({
            "items": [
                {"snippet": {}},
                {"snippet": {"topLevelComment": {"snippet": {"textDisplay": "ok"}}}}
            ]
        });
        assert_eq!(comment_texts(&body), vec!["ok"]);
    }

    #[test]
    fn missing_items_key_is_empty() {
        let body = json!({"error": {"code": 403}});
        assert!(comment_texts(&body).is_empty());
    }
}
