//! Process-global rendering environment.
//!
//! The fonts directory and the encoder/probe binary paths are read-only
//! configuration shared by every request; they are loaded once at startup
//! and threaded through components as an immutable value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

/// Immutable configuration for the media pipeline.
///
/// | Env Var            | Default             |
/// |--------------------|---------------------|
/// | `DATA_ROOT`        | `./data`            |
/// | `FONTS_DIR`        | `<DATA_ROOT>/fonts` |
/// | `ENCODER_BIN`      | `ffmpeg`            |
/// | `PROBE_BIN`        | `ffprobe`           |
/// | `TRANSCRIBE_BIN`   | `whisper-cli`       |
/// | `BURN_CONCURRENCY` | `2`                 |
/// | `BURN_TIMEOUT_S`   | `180`               |
#[derive(Debug, Clone)]
pub struct Environment {
    /// Root of the on-disk layout (`videos/`, `fonts/`, `tmp/`).
    pub data_root: PathBuf,
    /// Bundled font files; the only directory the encoder resolves fonts
    /// from. System fonts are never consulted.
    pub fonts_dir: PathBuf,
    /// Video encoder binary (libx264-capable FFmpeg).
    pub encoder_bin: String,
    /// Media probe binary (ffprobe).
    pub probe_bin: String,
    /// Speech-to-text binary producing whisper-style JSON.
    pub transcribe_bin: String,
    /// Maximum concurrent burns; waiters queue FIFO.
    pub burn_concurrency: usize,
    /// Wall-clock limit per burn.
    pub burn_timeout: Duration,
}

impl Environment {
    /// Load the environment from process variables with defaults.
    pub fn from_env() -> Self {
        let data_root =
            PathBuf::from(std::env::var("DATA_ROOT").unwrap_or_else(|_| "./data".into()));

        let fonts_dir = std::env::var("FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_root.join("fonts"));

        let burn_concurrency: usize = std::env::var("BURN_CONCURRENCY")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("BURN_CONCURRENCY must be a positive integer");

        let burn_timeout_s: u64 = std::env::var("BURN_TIMEOUT_S")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("BURN_TIMEOUT_S must be a positive integer");

        Self {
            data_root,
            fonts_dir,
            encoder_bin: std::env::var("ENCODER_BIN").unwrap_or_else(|_| "ffmpeg".into()),
            probe_bin: std::env::var("PROBE_BIN").unwrap_or_else(|_| "ffprobe".into()),
            transcribe_bin: std::env::var("TRANSCRIBE_BIN")
                .unwrap_or_else(|_| "whisper-cli".into()),
            burn_concurrency: burn_concurrency.max(1),
            burn_timeout: Duration::from_secs(burn_timeout_s),
        }
    }

    /// Directory holding a video's source file: `<DATA_ROOT>/videos/<uuid>/`.
    pub fn video_dir(&self, video_id: Uuid) -> PathBuf {
        self.data_root.join("videos").join(video_id.to_string())
    }

    /// Scratch space for per-request burn workdirs.
    pub fn tmp_dir(&self) -> PathBuf {
        self.data_root.join("tmp")
    }

    /// Locate a video's source file (`source.<ext>`) regardless of extension.
    pub fn find_source(&self, video_id: Uuid) -> Option<PathBuf> {
        let dir = self.video_dir(video_id);
        let entries = std::fs::read_dir(&dir).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .find(|p| source_stem(p) && p.is_file())
    }
}

fn source_stem(path: &Path) -> bool {
    path.file_stem().and_then(|s| s.to_str()) == Some("source")
}
