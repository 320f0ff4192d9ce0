use std::sync::Arc;

use lyricsync_core::burn::BurnQueue;
use lyricsync_core::environment::Environment;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lyricsync_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read-only media pipeline environment (data root, fonts, binaries).
    pub env: Arc<Environment>,
    /// FIFO admission queue capping concurrent encoder processes.
    pub burn_queue: Arc<BurnQueue>,
}

impl AppState {
    pub fn new(pool: lyricsync_db::DbPool, config: ServerConfig, env: Environment) -> Self {
        let burn_queue = Arc::new(BurnQueue::new(env.burn_concurrency));
        Self {
            pool,
            config: Arc::new(config),
            env: Arc::new(env),
            burn_queue,
        }
    }
}
