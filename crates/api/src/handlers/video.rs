//! Handler for `GET /api/video/{id}`: source media streaming with HTTP
//! range request support, so the browser preview can seek.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;
use lyricsync_core::error::CoreError;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::auth::{authorize_video, OwnerKey};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Maximum read chunk size for open-ended range requests (1 MiB).
const MAX_CHUNK_SIZE: u64 = 1024 * 1024;

/// Guess a Content-Type from a file extension.
fn content_type_for_extension(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`.
fn parse_range_header(range: &str) -> Option<(u64, Option<u64>)> {
    let range = range.strip_prefix("bytes=")?;
    let parts: Vec<&str> = range.splitn(2, '-').collect();
    if parts.len() != 2 {
        return None;
    }
    let start = parts[0].parse::<u64>().ok()?;
    let end = if parts[1].is_empty() {
        None
    } else {
        Some(parts[1].parse::<u64>().ok()?)
    };
    Some((start, end))
}

/// GET /api/video/{id}
///
/// Streams the source media back to its owner.
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    owner: OwnerKey,
    headers: HeaderMap,
) -> AppResult<Response> {
    let video = authorize_video(&state.pool, video_id, &owner.0).await?;

    let path = state.env.video_dir(video_id).join(&video.original_uri);
    let path = if path.is_file() {
        path
    } else {
        // The row and the tree can drift (manual moves, re-ingests with a
        // different extension); fall back to an extension-agnostic lookup.
        state
            .env
            .find_source(video_id)
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Video file",
                id: video_id.to_string(),
            }))?
    };

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let file_size = metadata.len();
    let content_type = content_type_for_extension(&path);

    // Check for Range header.
    if let Some(range_value) = headers.get(header::RANGE) {
        let range_str = range_value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Range header".into()))?;

        if let Some((start, end)) = parse_range_header(range_str) {
            let end = end
                .map(|e| e.min(file_size.saturating_sub(1)))
                .unwrap_or_else(|| (start + MAX_CHUNK_SIZE - 1).min(file_size.saturating_sub(1)));

            if start >= file_size || start > end {
                return Ok(Response::builder()
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{file_size}"))
                    .body(Body::empty())
                    .unwrap());
            }

            let length = end - start + 1;

            let mut file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            file.seek(std::io::SeekFrom::Start(start))
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

            let stream = ReaderStream::new(file.take(length));

            return Ok(Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{file_size}"),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from_stream(stream))
                .unwrap());
        }
    }

    // No Range header — serve the full file.
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let stream = ReaderStream::new(file);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(stream))
        .unwrap())
}
