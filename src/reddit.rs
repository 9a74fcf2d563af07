//! Subreddit aggregation: top posts, their comments, and replies.
//!
//! The listing fetch is the fail-hard step; each post's comment fetch and
//! every walk through the nested reply tree degrades by truncation instead.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::sanitize::clean_identifier;

const TOP_POSTS: usize = 10;
const TOP_COMMENTS: usize = 10;
const TOP_REPLIES: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RedditPost {
    pub title: String,
    pub description: String,
    pub url: String,
    pub upvote_ratio: f64,
    pub comments: Vec<RedditComment>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RedditComment {
    pub text: String,
    pub upvotes: i64,
    pub replies: Vec<RedditReply>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RedditReply {
    pub text: String,
    pub upvotes: i64,
}

/// Scraper for a subreddit's all-time top listing.
pub struct RedditScraper {
    client: Client,
    base_url: String,
}

impl RedditScraper {
    pub fn new(config: &Config) -> Self {
        // Reddit rejects default library agents; a browser-like UA is required.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .user_agent(config.http.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.reddit.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the all-time top posts with their comment trees.
    ///
    /// A failed listing fetch is an error for the caller; a failed comment
    /// fetch only leaves that post without comments.
    pub async fn scrape_subreddit(&self, raw_name: &str) -> Result<Vec<RedditPost>> {
        let subreddit = clean_identifier(raw_name);
        info!(%subreddit, "scraping subreddit");

        let listing_url = format!(
            "{}/r/{}/top/.json?t=all",
            self.base_url,
            urlencoding::encode(&subreddit)
        );
        let response = self.client.get(&listing_url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "subreddit listing fetch failed with HTTP {}",
                response.status()
            ));
        }
        let listing: Value = response.json().await?;

        let mut posts = parse_listing(&listing, &self.base_url);
        for post in &mut posts {
            match self.fetch_comments(&post.url).await {
                Ok(comments) => post.comments = comments,
                Err(e) => warn!(error = %e, post = %post.url, "comment fetch failed"),
            }
        }

        Ok(posts)
    }

    async fn fetch_comments(&self, post_url: &str) -> Result<Vec<RedditComment>> {
        let url = format!("{post_url}.json?sort=top");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "comment listing fetch failed with HTTP {}",
                response.status()
            ));
        }
        let payload: Value = response.json().await?;
        Ok(parse_comment_tree(&payload))
    }
}

/// Walk the listing children; a malformed entry truncates the remainder.
fn parse_listing(listing: &Value, base_url: &str) -> Vec<RedditPost> {
    let Some(children) = listing.pointer("/data/children").and_then(Value::as_array) else {
        return Vec::new();
    };
    children
        .iter()
        .take(TOP_POSTS)
        .map_while(|child| parse_post(child, base_url))
        .collect()
}

fn parse_post(child: &Value, base_url: &str) -> Option<RedditPost> {
    let data = child.get("data")?;
    Some(RedditPost {
        title: data.get("title")?.as_str()?.to_string(),
        description: data.get("selftext")?.as_str()?.to_string(),
        url: format!("{}{}", base_url, data.get("permalink")?.as_str()?),
        upvote_ratio: data.get("upvote_ratio")?.as_f64()?,
        comments: Vec::new(),
    })
}

/// The comment payload is `[post listing, comment listing]`; walk the second.
fn parse_comment_tree(payload: &Value) -> Vec<RedditComment> {
    let Some(children) = payload
        .get(1)
        .and_then(|listing| listing.pointer("/data/children"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    children
        .iter()
        .take(TOP_COMMENTS)
        .map_while(parse_comment)
        .collect()
}

fn parse_comment(child: &Value) -> Option<RedditComment> {
    let data = child.get("data")?;
    Some(RedditComment {
        text: data.get("body")?.as_str()?.to_string(),
        upvotes: data.get("ups")?.as_i64()?,
        replies: parse_replies(data.get("replies")),
    })
}

/// `replies` is the empty string when a comment has none.
fn parse_replies(replies: Option<&Value>) -> Vec<RedditReply> {
    let Some(children) = replies
        .and_then(|r| r.pointer("/data/children"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    children
        .iter()
        .take(TOP_REPLIES)
        .map_while(|child| {
            let data = child.get("data")?;
            Some(RedditReply {
                text: data.get("body")?.as_str()?.to_string(),
                upvotes: data.get("ups")?.as_i64()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_child(title: &str) -> Value {
        json!({
            "data": {
                "title": title,
                "selftext": "body text",
                "permalink": format!("/r/rust/comments/1/{title}/"),
                "upvote_ratio": 0.97
            }
        })
    }

    #[test]
    fn listing_walk_caps_at_ten() {
        let children: Vec<Value> = (0..15).map(|i| post_child(&format!("p{i}"))).collect();
        let listing = json!({"data": {"children": children}});
        let posts = parse_listing(&listing, "https://www.reddit.com");
        assert_eq!(posts.len(), 10);
        assert_eq!(posts[0].title, "p0");
        assert_eq!(posts[0].url, "https://www.reddit.com/r/rust/comments/1/p0/");
        assert_eq!(posts[0].upvote_ratio, 0.97);
    }

    #[test]
    fn malformed_post_truncates_the_remainder() {
        let listing = json!({
            "data": {
                "children": [
                    post_child("first"),
                    {"data": {"title": "no permalink", "selftext": "", "upvote_ratio": 0.5}},
                    post_child("unreachable")
                ]
            }
        });
        let posts = parse_listing(&listing, "https://www.reddit.com");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "first");
    }

    #[test]
    fn empty_or_alien_listing_yields_no_posts() {
        assert!(parse_listing(&json!({}), "x").is_empty());
        assert!(parse_listing(&json!({"data": {"children": []}}), "x").is_empty());
    }

    #[test]
    fn comment_tree_walks_comments_and_replies() {
        let payload = json!([
            {"data": {"children": [{"data": {"title": "the post"}}]}},
            {
                "data": {
                    "children": [
                        {
                            "data": {
                                "body": "top comment",
                                "ups": 42,
                                "replies": {
                                    "data": {
                                        "children": [
                                            {"data": {"body": "reply one", "ups": 7}},
                                            {"data": {"body": "reply two", "ups": 3}}
                                        ]
                                    }
                                }
                            }
                        },
                        {"data": {"body": "second comment", "ups": 5, "replies": ""}}
                    ]
                }
            }
        ]);
        let comments = parse_comment_tree(&payload);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "top comment");
        assert_eq!(comments[0].upvotes, 42);
        assert_eq!(comments[0].replies.len(), 2);
        assert_eq!(comments[0].replies[1].text, "reply two");
        // Empty-string replies field means no replies.
        assert!(comments[1].replies.is_empty());
    }

    #[test]
    fn reply_walk_caps_at_five() {
        let replies: Vec<Value> = (0..9)
            .map(|i| json!({"data": {"body": format!("r{i}"), "ups": i}}))
            .collect();
        let parsed = parse_replies(Some(&json!({"data": {"children": replies}})));
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn more_marker_truncates_comment_walk() {
        // The trailing "more" child has no body; the walk stops there.
        let payload = json!([
            {},
            {
                "data": {
                    "children": [
                        {"data": {"body": "real comment", "ups": 1, "replies": ""}},
                        {"data": {"count": 12, "children": ["abc"]}}
                    ]
                }
            }
        ]);
        let comments = parse_comment_tree(&payload);
        assert_eq!(comments.len(), 1);
    }
}
