//! Video entity model and DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: Uuid,
    /// Capability token checked against the `X-Owner-Key` header.
    #[serde(skip_serializing)]
    pub owner_key: String,
    /// Source filename under `<DATA_ROOT>/videos/<id>/`.
    pub original_uri: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new video at ingest.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub id: Uuid,
    pub owner_key: String,
    pub original_uri: String,
}
