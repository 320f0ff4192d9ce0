//! Repository for the `videos` table.

use lyricsync_core::segments::Segment;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::video::{CreateVideo, Video};
use crate::repositories::segment_repo;

const COLUMNS: &str = "id, owner_key, original_uri, created_at, updated_at";

/// Provides operations on video records.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video together with its initial transcription segments in
    /// one transaction.
    ///
    /// Either the video row and every segment land, or nothing does — a
    /// failed transcription insert must not leave an orphaned video.
    pub async fn create_with_segments(
        pool: &PgPool,
        input: &CreateVideo,
        segments: &[Segment],
    ) -> Result<Video, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos (id, owner_key, original_uri)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(input.id)
            .bind(&input.owner_key)
            .bind(&input.original_uri)
            .fetch_one(&mut *tx)
            .await?;

        segment_repo::insert_all(&mut tx, input.id, segments).await?;

        tx.commit().await?;
        Ok(video)
    }

    /// Find a video by its UUID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a video (admin only; cascades to its segments). Returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
