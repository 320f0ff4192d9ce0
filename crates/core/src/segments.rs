//! Segment validation and transcription normalization.
//!
//! A segment is one timed lyric line. The rules here are the write-side
//! contract of the segment store: client saves are rejected on violation,
//! while raw transcription output is repaired instead.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum text length of a single segment, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// A timed lyric line bound to one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Local id, unique within the video.
    pub id: i32,
    /// Start time in seconds, non-negative.
    pub start_s: f64,
    /// End time in seconds, strictly after `start_s`.
    pub end_s: f64,
    /// Display text; may be empty.
    pub text: String,
}

/// A segment as produced by the speech-to-text service, before ids are
/// assigned and overlaps repaired.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

/// Validate a client-submitted replacement set.
///
/// Bounds violations and duplicate ids fail with `Validation`; overlapping
/// segments fail with `Conflict`. The caller rejects the whole write on any
/// error.
pub fn validate_replace_set(segments: &[Segment]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for seg in segments {
        if !seg.start_s.is_finite() || !seg.end_s.is_finite() {
            return Err(CoreError::Validation(format!(
                "segment {}: start/end must be finite numbers",
                seg.id
            )));
        }
        if seg.start_s < 0.0 {
            return Err(CoreError::Validation(format!(
                "segment {}: start_s must be >= 0, got {}",
                seg.id, seg.start_s
            )));
        }
        if seg.end_s <= seg.start_s {
            return Err(CoreError::Validation(format!(
                "segment {}: end_s ({}) must be greater than start_s ({})",
                seg.id, seg.end_s, seg.start_s
            )));
        }
        if seg.text.chars().count() > MAX_TEXT_CHARS {
            return Err(CoreError::Validation(format!(
                "segment {}: text exceeds {MAX_TEXT_CHARS} characters",
                seg.id
            )));
        }
        if !seen.insert(seg.id) {
            return Err(CoreError::Validation(format!(
                "segment id {} appears more than once",
                seg.id
            )));
        }
    }

    // Overlap check runs on a copy sorted by start time; storage order is
    // up to the client.
    let mut by_start: Vec<&Segment> = segments.iter().collect();
    by_start.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));
    for pair in by_start.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.start_s < prev.end_s {
            return Err(CoreError::Conflict(format!(
                "segments {} and {} overlap: [{}, {}) and [{}, {})",
                prev.id, next.id, prev.start_s, prev.end_s, next.start_s, next.end_s
            )));
        }
    }
    Ok(())
}

/// Repair raw transcription output into a valid segment set.
///
/// Sorts by start time, truncates text to [`MAX_TEXT_CHARS`], clips each
/// segment's end to the next segment's start, drops segments the clip (or
/// the source) left empty, and renumbers ids contiguously from zero.
pub fn normalize_transcription(mut raw: Vec<RawSegment>) -> Vec<Segment> {
    raw.retain(|s| s.start.is_finite() && s.end.is_finite() && s.start >= 0.0);
    raw.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut out: Vec<Segment> = Vec::with_capacity(raw.len());
    for (i, seg) in raw.iter().enumerate() {
        let mut end = seg.end;
        if let Some(next) = raw.get(i + 1) {
            end = end.min(next.start);
        }
        if end <= seg.start {
            continue;
        }
        let text = if seg.text.chars().count() > MAX_TEXT_CHARS {
            seg.text.chars().take(MAX_TEXT_CHARS).collect()
        } else {
            seg.text.clone()
        };
        out.push(Segment {
            id: out.len() as i32,
            start_s: seg.start,
            end_s: end,
            text,
        });
    }
    out
}
