//! Handler for `POST /api/burn`: render the final MP4.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lyricsync_core::burn::BurnJob;
use lyricsync_core::error::CoreError;
use lyricsync_core::segments::{self, Segment};
use lyricsync_core::style::Style;
use lyricsync_db::repositories::SegmentRepo;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::auth::{authorize_video, OwnerKey};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BurnRequest {
    pub video_id: Uuid,
    /// When non-empty, this set is validated and written to the store
    /// before burning; the store stays the single source of truth.
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub style: Option<Style>,
}

/// POST /api/burn
///
/// Persists the submitted segments (if any), probes the source, builds the
/// ASS document, and returns the burned MP4. The actual encode runs on a
/// spawned task guarded by a cancellation token: if the client disconnects,
/// this handler's future is dropped, the token fires, and the encoder is
/// shut down gracefully.
pub async fn burn_video(
    State(state): State<AppState>,
    owner: OwnerKey,
    Json(body): Json<BurnRequest>,
) -> AppResult<Response> {
    let video = authorize_video(&state.pool, body.video_id, &owner.0).await?;

    if !body.segments.is_empty() {
        segments::validate_replace_set(&body.segments)?;
        SegmentRepo::replace_all(&state.pool, body.video_id, &body.segments).await?;
    }

    let rows = SegmentRepo::list_by_video(&state.pool, body.video_id).await?;
    if rows.is_empty() {
        return Err(AppError::BadRequest("No segments to burn".into()));
    }
    let segments: Vec<Segment> = rows.into_iter().map(Segment::from).collect();

    let video_path = state.env.video_dir(video.id).join(&video.original_uri);
    let video_path = if video_path.is_file() {
        video_path
    } else {
        state
            .env
            .find_source(video.id)
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Video file",
                id: video.id.to_string(),
            }))?
    };

    let job = BurnJob {
        video_path,
        segments,
        style: body.style.unwrap_or_default(),
    };

    let cancel = CancellationToken::new();
    // Dropping the guard (normal return or client disconnect) cancels the
    // token; disarm on the success path below.
    let guard = cancel.clone().drop_guard();

    let queue = Arc::clone(&state.burn_queue);
    let env = Arc::clone(&state.env);
    let task = tokio::spawn(async move { queue.burn(&env, job, cancel).await });

    let bytes = task
        .await
        .map_err(|e| AppError::InternalError(format!("burn task panicked: {e}")))?
        .map_err(AppError::Core)?;
    guard.disarm();

    let filename = format!("{}_burned.mp4", video.id);
    Ok((
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
