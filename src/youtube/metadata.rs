//! Video metadata resolution via the `yt-dlp` JSON dump.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::debug;

/// Per-interval audience-retention sample from the platform heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RetentionPoint {
    pub start_time: f64,
    pub end_time: f64,
    pub value: f64,
}

/// A subtitle track offered for the video.
#[derive(Debug, Clone, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
    #[serde(default)]
    pub ext: Option<String>,
}

/// The subset of the resolver's JSON dump this service consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub heatmap: Option<Vec<RetentionPoint>>,

    /// Keyed by language code; populated only when subtitles were requested.
    #[serde(default)]
    pub requested_subtitles: Option<HashMap<String, SubtitleTrack>>,
}

impl VideoMetadata {
    /// Manual English track if present, otherwise the auto-generated one.
    pub fn english_subtitle(&self) -> Option<&SubtitleTrack> {
        let tracks = self.requested_subtitles.as_ref()?;
        tracks.get("en").or_else(|| tracks.get("en-auto"))
    }
}

/// Runs the `yt-dlp` binary in JSON-dump mode.
///
/// English subtitle tracks (manual and auto-generated) are requested in the
/// dump; no media stream is ever downloaded.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    program: String,
}

impl MetadataResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve full metadata for a single video URL.
    pub async fn resolve(&self, url: &str) -> Result<VideoMetadata> {
        let stdout = self
            .dump_json(&[
                "--dump-single-json",
                "--skip-download",
                "--no-warnings",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                "en,en-auto",
                url,
            ])
            .await?;
        let metadata: VideoMetadata = serde_json::from_str(&stdout)?;
        debug!(video_id = %metadata.id, "resolved video metadata");
        Ok(metadata)
    }

    /// Run the resolver with the given arguments and return raw stdout.
    pub(crate) async fn dump_json(&self, args: &[&str]) -> Result<String> {
        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| anyhow!("failed to launch {}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
