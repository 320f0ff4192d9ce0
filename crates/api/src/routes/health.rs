use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
///
/// Besides liveness this reports the burn queue's occupancy, since the
/// encoder slots are the service's scarcest resource: a saturated queue
/// means new burns will wait in FIFO order rather than start.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Configured burn concurrency cap (`BURN_CONCURRENCY`).
    pub burn_capacity: usize,
    /// Burns currently holding an encoder slot.
    pub burns_in_flight: usize,
}

/// GET /health -- returns service, database, and burn queue health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = lyricsync_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        burn_capacity: state.burn_queue.capacity(),
        burns_in_flight: state.burn_queue.in_flight(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
