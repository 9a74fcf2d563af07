//! WebVTT parsing and sponsor-window transcript assembly.

use std::collections::HashSet;

use super::sponsorblock::SponsorSegment;

/// A single subtitle cue, timestamps in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Parse WebVTT content into cues.
///
/// The header, NOTE/STYLE blocks, and cue identifiers are skipped; cue
/// settings after the end timestamp are ignored. Both `HH:MM:SS.mmm` and
/// `MM:SS.mmm` timestamps are accepted.
pub fn parse_vtt(content: &str) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if !line.contains("-->") {
            continue;
        }

        let mut parts = line.splitn(2, "-->");
        let start = parts.next().and_then(|s| timestamp_seconds(s.trim()));
        let end = parts
            .next()
            .and_then(|s| s.trim().split_whitespace().next())
            .and_then(timestamp_seconds);
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };

        let mut text_lines = Vec::new();
        while let Some(next) = lines.peek().copied() {
            let trimmed = next.trim();
            if trimmed.is_empty() || trimmed.contains("-->") {
                break;
            }
            text_lines.push(trimmed.to_string());
            lines.next();
        }

        if !text_lines.is_empty() {
            captions.push(Caption {
                start,
                end,
                text: text_lines.join("\n"),
            });
        }
    }

    captions
}

fn timestamp_seconds(stamp: &str) -> Option<f64> {
    let parts: Vec<&str> = stamp.split(':').collect();
    let (hours, minutes, seconds) = match parts.len() {
        3 => (
            parts[0].parse::<f64>().ok()?,
            parts[1].parse::<f64>().ok()?,
            parts[2].parse::<f64>().ok()?,
        ),
        2 => (
            0.0,
            parts[0].parse::<f64>().ok()?,
            parts[1].parse::<f64>().ok()?,
        ),
        _ => return None,
    };
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Collect every caption line that falls inside a sponsor window.
///
/// A caption is selected when its start or end timestamp lands within a
/// segment span. Lines are deduplicated globally across all segments,
/// preserving first-seen order, and joined with single spaces.
pub fn sponsor_transcript(captions: &[Caption], segments: &[SponsorSegment]) -> String {
    let mut seen = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for seg in segments {
        for caption in captions {
            let in_window = (seg.start <= caption.start && caption.start <= seg.end)
                || (seg.start <= caption.end && caption.end <= seg.end);
            if !in_window {
                continue;
            }
            for line in caption.text.trim().lines() {
                if seen.insert(line.to_string()) {
                    lines.push(line.to_string());
                }
            }
        }
    }

    lines.join(" ")
}
