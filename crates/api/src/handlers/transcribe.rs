//! Handler for `POST /api/transcribe`: ingest + speech-to-text.

use axum::extract::{Multipart, State};
use axum::Json;
use lyricsync_core::owner_key::generate_owner_key;
use lyricsync_core::segments::{normalize_transcription, Segment};
use lyricsync_core::transcript::run_transcriber;
use lyricsync_db::models::video::CreateVideo;
use lyricsync_db::repositories::VideoRepo;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Upload extensions accepted for ingest.
const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "m4a", "mp3", "wav", "webm"];

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub video_id: Uuid,
    /// Capability token for all subsequent requests; shown exactly once.
    pub owner_key: String,
    pub segments: Vec<Segment>,
}

/// POST /api/transcribe
///
/// Accepts a multipart form with a required `file` field. Ids are
/// generated before any side effect so the upload, the video row, and the
/// transcription segments all reference the same project; the row and
/// segments commit in one transaction, and the saved file is removed again
/// if anything after it fails.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<TranscribeResponse>> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.mp4").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let ext = filename
        .rsplit('.')
        .next()
        .filter(|e| *e != filename)
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "mp4".into());
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file type '.{ext}'. Supported: .mp4, .mov, .m4a, .mp3, .wav, .webm"
        )));
    }

    let video_id = Uuid::new_v4();
    let owner_key = generate_owner_key();

    let video_dir = state.env.video_dir(video_id);
    tokio::fs::create_dir_all(&video_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create video dir: {e}")))?;

    let original_uri = format!("source.{ext}");
    let source_path = video_dir.join(&original_uri);
    tokio::fs::write(&source_path, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to save upload: {e}")))?;

    let duration = lyricsync_core::ffmpeg::probe_duration(&state.env.probe_bin, &source_path)
        .await
        .ok()
        .flatten();
    tracing::info!(%video_id, bytes = data.len(), ?duration, "upload saved, transcribing");

    let raw = match run_transcriber(&state.env.transcribe_bin, &source_path).await {
        Ok(raw) => raw,
        Err(err) => {
            cleanup_upload(&video_dir).await;
            return Err(err.into());
        }
    };
    let segments = normalize_transcription(raw);

    let input = CreateVideo {
        id: video_id,
        owner_key: owner_key.clone(),
        original_uri,
    };
    if let Err(err) = VideoRepo::create_with_segments(&state.pool, &input, &segments).await {
        cleanup_upload(&video_dir).await;
        return Err(err.into());
    }

    tracing::info!(%video_id, segments = segments.len(), "transcription stored");

    Ok(Json(TranscribeResponse {
        video_id,
        owner_key,
        segments,
    }))
}

/// Best-effort removal of a failed ingest's files.
async fn cleanup_upload(video_dir: &std::path::Path) {
    if let Err(err) = tokio::fs::remove_dir_all(video_dir).await {
        tracing::warn!(%err, dir = %video_dir.display(), "failed to clean up upload");
    }
}
