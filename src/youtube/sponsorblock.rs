//! Sponsor segment lookup against the SponsorBlock public API.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// A community-flagged sponsored time range within a video, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SponsorSegment {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Deserialize)]
struct SkipSegment {
    segment: [f64; 2],
}

/// Fetch the "sponsor" category segments for a video.
///
/// A non-2xx response (the API answers 404 for videos without submissions)
/// yields an empty set rather than an error; only transport failures
/// propagate to the caller.
pub async fn fetch_sponsor_segments(
    client: &Client,
    api_base: &str,
    video_id: &str,
) -> Result<Vec<SponsorSegment>> {
    let url = format!("{}/api/skipSegments", api_base.trim_end_matches('/'));
    let response = client
        .get(&url)
        .query(&[("videoID", video_id), ("category", "sponsor")])
        .send()
        .await?;

    if !response.status().is_success() {
        debug!(status = %response.status(), video_id, "no sponsor segments returned");
        return Ok(Vec::new());
    }

    let raw: Vec<SkipSegment> = response.json().await?;
    Ok(raw
        .into_iter()
        .map(|s| SponsorSegment {
            start: s.segment[0],
            end: s.segment[1],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_segment_wire_format_parses() {
        let raw: Vec<SkipSegment> = serde_json::from_str(
            r#"[
                {"segment": [12.5, 48.0], "category": "sponsor", "UUID": "x"},
                {"segment": [300.0, 330.25], "category": "sponsor", "UUID": "y"}
            ]"#,
        )
        .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].segment, [12.5, 48.0]);
        assert_eq!(raw[1].segment[1], 330.25);
    }
}
