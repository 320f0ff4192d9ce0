pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Maximum accepted upload size for ingest (512 MiB).
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Build the `/api` route tree.
///
/// ```text
/// POST /transcribe       upload + speech-to-text (public; issues owner key)
/// GET  /video/{id}       source media bytes (range-capable)
/// GET  /segments/{id}    list segments, sorted by start
/// PUT  /segments/{id}    atomic segment replacement
/// POST /burn             render and return the burned MP4
/// ```
///
/// All routes except `/transcribe` authenticate via the `X-Owner-Key`
/// header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transcribe",
            post(handlers::transcribe::transcribe).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/video/{id}", get(handlers::video::get_video))
        .route(
            "/segments/{id}",
            get(handlers::segments::get_segments).put(handlers::segments::update_segments),
        )
        .route("/burn", post(handlers::burn::burn_video))
}
