//! Sponsorship retention ratio.

use super::metadata::RetentionPoint;
use super::sponsorblock::SponsorSegment;

/// Ratio of median audience retention inside sponsor segments to the median
/// outside them, rounded to four decimal places.
///
/// A point counts as inside when it lies entirely within at least one
/// segment span. Returns `None` when the ratio is not computable: empty
/// heatmap, a bucket with no points, or a non-finite quotient. The caller
/// decides what sentinel stands in for "not computable".
pub fn sponsorship_retention_ratio(
    heatmap: &[RetentionPoint],
    segments: &[SponsorSegment],
) -> Option<f64> {
    if heatmap.is_empty() {
        return None;
    }

    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for point in heatmap {
        let sponsored = segments
            .iter()
            .any(|seg| seg.start <= point.start_time && point.end_time <= seg.end);
        if sponsored {
            inside.push(point.value);
        } else {
            outside.push(point.value);
        }
    }

    let ratio = median(&inside)? / median(&outside)?;
    if !ratio.is_finite() {
        return None;
    }
    Some((ratio * 10_000.0).round() / 10_000.0)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
