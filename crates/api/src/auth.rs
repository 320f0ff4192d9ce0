//! Owner-key authentication.
//!
//! Every privileged route takes the per-video capability token from the
//! `X-Owner-Key` header and checks it against the video row. The two
//! failure modes are distinct: 404 when the video does not exist, 403 when
//! it exists but the key does not match.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lyricsync_core::error::CoreError;
use lyricsync_db::models::video::Video;
use lyricsync_db::repositories::VideoRepo;
use lyricsync_db::DbPool;
use uuid::Uuid;

use crate::error::AppError;

pub const OWNER_KEY_HEADER: &str = "x-owner-key";

/// Extractor for the `X-Owner-Key` header. Missing or non-ASCII values
/// reject with 401 before the handler runs.
pub struct OwnerKey(pub String);

impl<S> FromRequestParts<S> for OwnerKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing X-Owner-Key header".into(),
                ))
            })?;
        Ok(OwnerKey(value.to_string()))
    }
}

/// Load a video and enforce ownership.
pub async fn authorize_video(
    pool: &DbPool,
    video_id: Uuid,
    owner_key: &str,
) -> Result<Video, AppError> {
    let video = VideoRepo::find_by_id(pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id.to_string(),
        }))?;

    if video.owner_key != owner_key {
        return Err(AppError::Core(CoreError::Forbidden(
            "Owner key does not match".into(),
        )));
    }
    Ok(video)
}
