// All functions in this module are shared test helpers. Not every test
// binary uses every helper, so we suppress dead_code warnings here.
#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lyricsync_api::config::ServerConfig;
use lyricsync_api::router::build_app_router;
use lyricsync_api::state::AppState;
use lyricsync_core::environment::Environment;
use lyricsync_core::segments::Segment;
use lyricsync_db::models::video::CreateVideo;
use lyricsync_db::repositories::VideoRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build a test `Environment` rooted in a fresh temp directory.
///
/// The returned `TempDir` guard must be kept alive for the duration of the
/// test; dropping it deletes the data root.
pub fn test_environment() -> (Environment, tempfile::TempDir) {
    let root = tempfile::tempdir().expect("create temp data root");
    let env = Environment {
        data_root: root.path().to_path_buf(),
        fonts_dir: root.path().join("fonts"),
        encoder_bin: "ffmpeg".into(),
        probe_bin: "ffprobe".into(),
        transcribe_bin: "whisper-cli".into(),
        burn_concurrency: 2,
        burn_timeout: Duration::from_secs(30),
    };
    (env, root)
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a temp-dir environment.
///
/// Delegates to [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> (Router, tempfile::TempDir) {
    let (env, root) = test_environment();
    build_test_app_with_env(pool, env, root)
}

/// Build the test app around an environment the caller prepared.
pub fn build_test_app_with_env(
    pool: PgPool,
    env: Environment,
    root: tempfile::TempDir,
) -> (Router, tempfile::TempDir) {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), env);
    (build_app_router(state, &config), root)
}

/// Insert a video row plus an on-disk source file; returns the id and the
/// owner key.
pub async fn seed_video(
    pool: &PgPool,
    env: &Environment,
    segments: &[Segment],
) -> (Uuid, String) {
    let video_id = Uuid::new_v4();
    let owner_key = lyricsync_core::owner_key::generate_owner_key();

    let dir = env.video_dir(video_id);
    std::fs::create_dir_all(&dir).expect("create video dir");
    std::fs::write(dir.join("source.mp4"), b"not a real mp4").expect("write source file");

    let input = CreateVideo {
        id: video_id,
        owner_key: owner_key.clone(),
        original_uri: "source.mp4".into(),
    };
    VideoRepo::create_with_segments(pool, &input, segments)
        .await
        .expect("seed video");

    (video_id, owner_key)
}

/// A disjoint two-segment set used across tests.
pub fn sample_segments() -> Vec<Segment> {
    vec![
        Segment {
            id: 0,
            start_s: 0.0,
            end_s: 2.5,
            text: "hello".into(),
        },
        Segment {
            id: 1,
            start_s: 2.5,
            end_s: 5.0,
            text: "world".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Shared HTTP test helpers
// ---------------------------------------------------------------------------

/// Collect the response body into a `serde_json::Value`.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a JSON request with the given HTTP method and owner key.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    owner_key: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = owner_key {
        builder = builder.header("x-owner-key", key);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PUT JSON to the given URI with an owner key.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    owner_key: &str,
) -> axum::response::Response {
    send_json(app, Method::PUT, uri, body, Some(owner_key)).await
}

/// POST JSON to the given URI with an owner key.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    owner_key: &str,
) -> axum::response::Response {
    send_json(app, Method::POST, uri, body, Some(owner_key)).await
}

/// GET from the given URI, optionally with an owner key.
pub async fn get(app: Router, uri: &str, owner_key: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = owner_key {
        builder = builder.header("x-owner-key", key);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single-file multipart form to the given URI.
pub async fn post_multipart_file(
    app: Router,
    uri: &str,
    filename: &str,
    data: &[u8],
) -> axum::response::Response {
    let boundary = "lyricsync-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Write an executable stub transcriber that prints the given JSON to
/// stdout, returning its path.
pub fn stub_transcriber(dir: &std::path::Path, json: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("stub-transcriber.sh");
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{json}\nEOF\n");
    std::fs::write(&path, script).expect("write stub transcriber");
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
