//! Handlers for the `/api/segments/{id}` resource.

use axum::extract::{Path, State};
use axum::Json;
use lyricsync_core::segments::{self, Segment};
use lyricsync_db::repositories::SegmentRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authorize_video, OwnerKey};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub video_id: Uuid,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
pub struct SegmentsUpdateRequest {
    pub segments: Vec<Segment>,
}

/// GET /api/segments/{id}
///
/// Returns the video's segments sorted by start time.
pub async fn get_segments(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    owner: OwnerKey,
) -> AppResult<Json<SegmentsResponse>> {
    authorize_video(&state.pool, video_id, &owner.0).await?;

    let rows = SegmentRepo::list_by_video(&state.pool, video_id).await?;
    Ok(Json(SegmentsResponse {
        video_id,
        segments: rows.into_iter().map(Segment::from).collect(),
    }))
}

/// PUT /api/segments/{id}
///
/// Atomic replacement of the video's segment set. The submitted set is
/// validated first (bounds, unique ids, no overlaps); a rejected write
/// leaves the prior set untouched.
pub async fn update_segments(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    owner: OwnerKey,
    Json(body): Json<SegmentsUpdateRequest>,
) -> AppResult<Json<SegmentsResponse>> {
    authorize_video(&state.pool, video_id, &owner.0).await?;

    segments::validate_replace_set(&body.segments)?;
    SegmentRepo::replace_all(&state.pool, video_id, &body.segments).await?;

    // Echo the stored set back in its canonical (sorted) order.
    let rows = SegmentRepo::list_by_video(&state.pool, video_id).await?;
    Ok(Json(SegmentsResponse {
        video_id,
        segments: rows.into_iter().map(Segment::from).collect(),
    }))
}
