//! End-to-end burn test against a real FFmpeg installation.
//!
//! Ignored by default: it shells out to `ffmpeg`/`ffprobe` and needs the
//! bundled fonts directory. Run with:
//!
//! ```text
//! cargo test -p lyricsync-api --test burn_golden -- --ignored
//! ```
//!
//! When `GOLDEN_FRAME` points at a stored reference PNG, the frame at
//! t = 1.0 s of the burned output is compared against it pixel-wise
//! (≤ 1% of pixels may exceed a per-channel delta of 16).

mod common;

use std::path::Path;
use std::time::Duration;

use common::*;
use lyricsync_core::burn::{BurnJob, BurnQueue};
use lyricsync_core::environment::Environment;
use lyricsync_core::style::Style;
use tokio_util::sync::CancellationToken;

/// Synthesize a 3-second test clip with ffmpeg's testsrc generator.
async fn make_test_clip(path: &Path) {
    let status = tokio::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=3:size=640x360:rate=24",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(path)
        .status()
        .await
        .expect("ffmpeg must be installed for this test");
    assert!(status.success(), "test clip generation failed");
}

/// Extract the frame at the given timestamp as raw RGB24 bytes.
async fn extract_frame_rgb(video: &Path, at_secs: f64, out: &Path) -> Vec<u8> {
    let status = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-ss", &format!("{at_secs:.3}"), "-i"])
        .arg(video)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgb24"])
        .arg(out)
        .status()
        .await
        .expect("frame extraction failed to launch");
    assert!(status.success(), "frame extraction failed");
    std::fs::read(out).unwrap()
}

#[tokio::test]
#[ignore = "requires ffmpeg/ffprobe and bundled fonts on PATH"]
async fn burned_output_matches_source_dimensions_and_golden_frame() {
    let root = tempfile::tempdir().unwrap();
    let env = Environment {
        data_root: root.path().to_path_buf(),
        fonts_dir: std::env::var("FONTS_DIR")
            .map(Into::into)
            .unwrap_or_else(|_| root.path().join("fonts")),
        encoder_bin: "ffmpeg".into(),
        probe_bin: "ffprobe".into(),
        transcribe_bin: "whisper-cli".into(),
        burn_concurrency: 2,
        burn_timeout: Duration::from_secs(120),
    };

    let clip = root.path().join("clip.mp4");
    make_test_clip(&clip).await;

    let queue = BurnQueue::new(2);
    let job = BurnJob {
        video_path: clip.clone(),
        segments: sample_segments(),
        style: Style::default(),
    };
    let bytes = queue
        .burn(&env, job, CancellationToken::new())
        .await
        .expect("burn should succeed");
    assert!(!bytes.is_empty());

    // PlayRes identity: the burned output keeps the source dimensions.
    let burned = root.path().join("burned.mp4");
    std::fs::write(&burned, &bytes).unwrap();
    let dims = lyricsync_core::ffmpeg::probe_resolution("ffprobe", &burned)
        .await
        .unwrap();
    assert_eq!(dims, (640, 360));

    // Golden comparison, when a reference frame is available.
    let Ok(golden_path) = std::env::var("GOLDEN_FRAME") else {
        return;
    };
    let golden = std::fs::read(&golden_path).expect("read golden frame");
    let frame = extract_frame_rgb(&burned, 1.0, &root.path().join("frame.rgb")).await;
    assert_eq!(frame.len(), golden.len(), "frame geometry mismatch");

    let deviant = frame
        .iter()
        .zip(golden.iter())
        .filter(|(a, b)| a.abs_diff(**b) > 16)
        .count();
    let ratio = deviant as f64 / frame.len() as f64;
    assert!(
        ratio <= 0.01,
        "{:.3}% of channel samples deviate beyond the threshold",
        ratio * 100.0
    );
}
