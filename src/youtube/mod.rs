//! YouTube scraping: metadata, sponsor analysis, comments, and search.
//!
//! [`YouTubeScraper`] owns the outbound HTTP client and the metadata
//! resolver; [`YouTubeScraper::scrape_video`] composes the fault-isolated
//! sub-steps into a single [`VideoReport`].

pub mod comments;
pub mod metadata;
pub mod retention;
pub mod search;
pub mod sponsorblock;
pub mod transcript;

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::sanitize::clean_identifier;
use metadata::{MetadataResolver, VideoMetadata};
use search::SearchHit;
use sponsorblock::SponsorSegment;

/// Advisory returned for Shorts URLs instead of a report.
pub const SHORTS_ADVISORY: &str =
    "Cannot scrape YouTube Shorts, try some other long form video";

/// Stand-in transcript when no English track or sponsor segments exist.
pub const NO_SPONSOR_TRANSCRIPT: &str =
    "No sponsor segments or English subtitles available.";

const NO_DESCRIPTION: &str = "No description available.";

/// Sentinel for a retention ratio that could not be computed.
const RETENTION_UNAVAILABLE: f64 = -1.0;

/// Combined per-video report. Wire keys match the upstream service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoReport {
    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Sponsor Transcript")]
    pub sponsor_transcript: String,

    #[serde(rename = "Sponsorship Retention Ratio")]
    pub retention_ratio: f64,

    #[serde(rename = "Comments")]
    pub comments: Vec<String>,
}

/// Outcome of a video scrape: a full report, or a plain advisory string.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum VideoScrapeResult {
    Advisory(String),
    Report(VideoReport),
}

/// Scraper for individual videos and keyword search.
pub struct YouTubeScraper {
    client: Client,
    resolver: MetadataResolver,
    sponsorblock_api: String,
    comments_api: String,
    comments_api_key: String,
    comments_referer: String,
}

impl YouTubeScraper {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .user_agent(config.http.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            resolver: MetadataResolver::new(config.youtube.yt_dlp_path.clone()),
            sponsorblock_api: config.youtube.sponsorblock_api.clone(),
            comments_api: config.youtube.comments_api.clone(),
            comments_api_key: config.youtube.comments_api_key.clone().unwrap_or_default(),
            comments_referer: config.youtube.comments_referer.clone(),
        }
    }

    /// Scrape one long-form video into a [`VideoReport`].
    ///
    /// Metadata resolution is the only fail-hard step. Sponsor segments,
    /// the retention ratio, the sponsor transcript, and comments each
    /// degrade to their documented defaults independently, so one upstream
    /// outage never empties the rest of the report.
    pub async fn scrape_video(&self, raw_url: &str) -> Result<VideoScrapeResult> {
        let url = clean_identifier(raw_url);
        info!(%url, "scraping video");

        if url.contains("youtube.com/shorts") {
            return Ok(VideoScrapeResult::Advisory(SHORTS_ADVISORY.to_string()));
        }

        let info = self.resolver.resolve(&url).await?;

        let segments = match sponsorblock::fetch_sponsor_segments(
            &self.client,
            &self.sponsorblock_api,
            &info.id,
        )
        .await
        {
            Ok(segments) => segments,
            Err(e) => {
                warn!(error = %e, "sponsor segment lookup failed");
                Vec::new()
            }
        };

        let retention_ratio = info
            .heatmap
            .as_deref()
            .and_then(|heatmap| retention::sponsorship_retention_ratio(heatmap, &segments))
            .unwrap_or(RETENTION_UNAVAILABLE);

        let sponsor_transcript = match self.sponsor_transcript(&info, &segments).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_SPONSOR_TRANSCRIPT.to_string(),
            Err(e) => {
                warn!(error = %e, "sponsor transcript extraction failed");
                NO_SPONSOR_TRANSCRIPT.to_string()
            }
        };

        let comments = match video_id_from_url(&url) {
            Some(video_id) => comments::fetch_top_comments(
                &self.client,
                &self.comments_api,
                &self.comments_api_key,
                &self.comments_referer,
                &video_id,
            )
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "comment fetch failed");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(VideoScrapeResult::Report(VideoReport {
            description: info
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            sponsor_transcript,
            retention_ratio,
            comments,
        }))
    }

    /// Download the English subtitle track and cut it to the sponsor windows.
    ///
    /// `Ok(None)` means the fallback advisory applies (no track or no
    /// segments); errors cover fetch and decode failures.
    async fn sponsor_transcript(
        &self,
        info: &VideoMetadata,
        segments: &[SponsorSegment],
    ) -> Result<Option<String>> {
        let Some(track) = info.english_subtitle() else {
            return Ok(None);
        };
        if segments.is_empty() {
            return Ok(None);
        }

        let response = self.client.get(&track.url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "subtitle fetch returned HTTP {}",
                response.status()
            ));
        }
        let content = response.text().await?;
        let captions = transcript::parse_vtt(&content);
        debug!(
            captions = captions.len(),
            segments = segments.len(),
            "cutting transcript to sponsor windows"
        );
        Ok(Some(transcript::sponsor_transcript(&captions, segments)))
    }

    /// Flat keyword search ranked by view count.
    pub async fn search(&self, raw_query: &str) -> Result<Vec<SearchHit>> {
        let query = clean_identifier(raw_query);
        info!(%query, "searching videos");
        search::search_videos(&self.resolver, &query).await
    }
}

/// Extract the video id from a watch URL's query parameter, falling back to
/// the substring after the last `=` for inputs the URL parser rejects.
fn video_id_from_url(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            return Some(id.into_owned());
        }
    }
    url.rsplit('=')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_from_watch_url() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?feature=shared&v=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn video_id_falls_back_to_last_equals_segment() {
        assert_eq!(
            video_id_from_url("watch?v=xyz789"),
            Some("xyz789".to_string())
        );
    }

    #[test]
    fn advisory_serializes_as_bare_string() {
        let result = VideoScrapeResult::Advisory(SHORTS_ADVISORY.to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::Value::String(SHORTS_ADVISORY.to_string()));
    }

    #[test]
    fn report_serializes_with_upstream_wire_keys() {
        let result = VideoScrapeResult::Report(VideoReport {
            description: "d".to_string(),
            sponsor_transcript: "t".to_string(),
            retention_ratio: -1.0,
            comments: vec!["c".to_string()],
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["Description"], "d");
        assert_eq!(json["Sponsor Transcript"], "t");
        assert_eq!(json["Sponsorship Retention Ratio"], -1.0);
        assert_eq!(json["Comments"][0], "c");
    }
}
