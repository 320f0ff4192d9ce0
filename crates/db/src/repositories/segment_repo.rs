//! Repository for the `segments` table.

use lyricsync_core::segments::Segment;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::segment::SegmentRow;

const COLUMNS: &str = "video_id, id, start_s, end_s, text";

/// Provides the segment store operations.
pub struct SegmentRepo;

impl SegmentRepo {
    /// List a video's segments sorted by start time ascending.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: Uuid,
    ) -> Result<Vec<SegmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM segments
             WHERE video_id = $1
             ORDER BY start_s ASC"
        );
        sqlx::query_as::<_, SegmentRow>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically replace a video's segment set.
    ///
    /// Takes a row-level exclusive lock on the video record so concurrent
    /// writers serialize; "last writer" is defined by commit order. The
    /// caller has already validated the set — any constraint violation here
    /// rolls the whole transaction back, leaving the prior set observable.
    pub async fn replace_all(
        pool: &PgPool,
        video_id: Uuid,
        segments: &[Segment],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM videos WHERE id = $1 FOR UPDATE")
            .bind(video_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM segments WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;

        insert_all(&mut tx, video_id, segments).await?;

        tx.commit().await
    }
}

/// Bulk-insert segments inside an existing transaction.
pub(crate) async fn insert_all(
    tx: &mut Transaction<'_, Postgres>,
    video_id: Uuid,
    segments: &[Segment],
) -> Result<(), sqlx::Error> {
    for seg in segments {
        sqlx::query(
            "INSERT INTO segments (video_id, id, start_s, end_s, text)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(video_id)
        .bind(seg.id)
        .bind(seg.start_s)
        .bind(seg.end_s)
        .bind(&seg.text)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
