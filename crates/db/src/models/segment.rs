//! Segment entity model.

use lyricsync_core::segments::Segment;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `segments` table.
///
/// The composite key `(video_id, id)` makes the local integer id unique
/// within its video.
#[derive(Debug, Clone, FromRow)]
pub struct SegmentRow {
    pub video_id: Uuid,
    pub id: i32,
    pub start_s: f64,
    pub end_s: f64,
    pub text: String,
}

impl From<SegmentRow> for Segment {
    fn from(row: SegmentRow) -> Self {
        Segment {
            id: row.id,
            start_s: row.start_s,
            end_s: row.end_s,
            text: row.text,
        }
    }
}
