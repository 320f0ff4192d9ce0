//! Burn orchestrator: drives the external encoder.
//!
//! A burn writes the ASS script into a scoped working directory, launches
//! the encoder with the bundled fonts directory, streams its stderr into a
//! capped tail buffer, and returns the rendered MP4 bytes. The working
//! directory is removed on every exit path — success, failure, timeout,
//! and cancellation — via `TempDir` drop.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::environment::Environment;
use crate::error::CoreError;
use crate::ffmpeg;
use crate::segments::Segment;
use crate::style::Style;
use crate::subtitle::build_ass_document;

/// Encoder stderr kept for diagnostics, tail only.
pub const STDERR_TAIL_BYTES: usize = 64 * 1024;

/// Grace period between SIGTERM and SIGKILL when a burn is cancelled or
/// times out.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// One burn's inputs, owned so the job can run on a spawned task.
#[derive(Debug)]
pub struct BurnJob {
    /// Path to the source video under the data root.
    pub video_path: PathBuf,
    /// Sorted, non-overlapping segments (the segment store's contract).
    pub segments: Vec<Segment>,
    pub style: Style,
}

/// Admission queue for burns.
///
/// Burns are independent and run in parallel, each with its own working
/// directory; the semaphore caps how many encoder processes exist at once.
/// Waiters are served in FIFO order.
pub struct BurnQueue {
    permits: Semaphore,
    capacity: usize,
}

impl BurnQueue {
    pub fn new(concurrency: usize) -> Self {
        let capacity = concurrency.max(1);
        Self {
            permits: Semaphore::new(capacity),
            capacity,
        }
    }

    /// Configured concurrency cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Burns currently holding an encoder slot.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Run a burn once an admission slot frees up.
    ///
    /// Cancelling `cancel` while waiting abandons the queue slot; cancelling
    /// mid-encode signals the encoder (SIGTERM, then SIGKILL after the grace
    /// period) and cleans up.
    pub async fn burn(
        &self,
        env: &Environment,
        job: BurnJob,
        cancel: CancellationToken,
    ) -> Result<Vec<u8>, CoreError> {
        let _permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CoreError::Cancelled),
            permit = self.permits.acquire() => {
                permit.map_err(|_| CoreError::Internal("burn queue closed".into()))?
            }
        };
        run_burn(env, job, cancel).await
    }
}

async fn run_burn(
    env: &Environment,
    job: BurnJob,
    cancel: CancellationToken,
) -> Result<Vec<u8>, CoreError> {
    tokio::fs::create_dir_all(env.tmp_dir()).await?;
    let workdir = tempfile::Builder::new()
        .prefix("burn-")
        .tempdir_in(env.tmp_dir())?;

    let (width, height) = ffmpeg::probe_resolution(&env.probe_bin, &job.video_path).await?;

    let ass = build_ass_document(&job.segments, &job.style, (width, height))?;
    let ass_path = workdir.path().join("subs.ass");
    tokio::fs::write(&ass_path, ass).await?;

    let out_path = workdir.path().join("out.mp4");

    tracing::info!(
        video = %job.video_path.display(),
        width,
        height,
        segments = job.segments.len(),
        "burn start"
    );

    let args = encoder_args(env, &job.video_path, &ass_path, &out_path);
    let mut child = Command::new(&env.encoder_bin)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| CoreError::Internal(format!("failed to launch encoder: {e}")))?;

    let stderr_handle = child.stderr.take();
    let stderr_task = tokio::spawn(read_tail(stderr_handle, STDERR_TAIL_BYTES));

    let deadline = tokio::time::sleep(env.burn_timeout);
    tokio::pin!(deadline);

    let status = tokio::select! {
        status = child.wait() => status?,
        () = &mut deadline => {
            terminate(&mut child).await;
            return Err(CoreError::RenderTimeout(env.burn_timeout.as_secs()));
        }
        () = cancel.cancelled() => {
            terminate(&mut child).await;
            return Err(CoreError::Cancelled);
        }
    };

    let tail_bytes = stderr_task.await.unwrap_or_default();
    let stderr_tail = String::from_utf8_lossy(&tail_bytes).into_owned();

    if !status.success() {
        tracing::error!(exit = ?status.code(), "encoder failed");
        return Err(CoreError::RenderFailed {
            message: format!("encoder exited with {status}"),
            stderr_tail,
        });
    }

    let bytes = tokio::fs::read(&out_path).await.map_err(|_| {
        CoreError::RenderFailed {
            message: "encoder reported success but produced no output".into(),
            stderr_tail,
        }
    })?;

    tracing::info!(output_bytes = bytes.len(), "burn complete");
    Ok(bytes)
}

/// Effective encoder command line.
///
/// The subtitles filter resolves fonts from the bundled directory only, so
/// a burn renders identically on every host. `yuv420p` matches the pixel
/// format the golden images were recorded with; audio passes through.
fn encoder_args(env: &Environment, input: &Path, ass: &Path, output: &Path) -> Vec<OsString> {
    let filter = format!(
        "subtitles={}:fontsdir={}",
        ass.display(),
        env.fonts_dir.display()
    );
    vec![
        OsString::from("-y"),
        OsString::from("-i"),
        input.as_os_str().to_owned(),
        OsString::from("-vf"),
        OsString::from(filter),
        OsString::from("-c:v"),
        OsString::from("libx264"),
        OsString::from("-preset"),
        OsString::from("medium"),
        OsString::from("-crf"),
        OsString::from("18"),
        OsString::from("-pix_fmt"),
        OsString::from("yuv420p"),
        OsString::from("-c:a"),
        OsString::from("copy"),
        OsString::from("-movflags"),
        OsString::from("+faststart"),
        output.as_os_str().to_owned(),
    ]
}

/// Stop the encoder: SIGTERM, wait out the grace period, then SIGKILL.
async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        if tokio::time::timeout(TERM_GRACE, child.wait()).await.is_ok() {
            return;
        }
        tracing::warn!(pid, "encoder ignored SIGTERM, killing");
    }
    let _ = child.start_kill();
    let _ = child.wait().await;
}

/// Read a stream to completion, keeping only the last `cap` bytes.
async fn read_tail<R: AsyncRead + Unpin>(handle: Option<R>, cap: usize) -> Vec<u8> {
    let mut tail = Vec::new();
    let Some(mut stream) = handle else {
        return tail;
    };
    let mut buf = [0u8; 8192];
    while let Ok(n) = stream.read(&mut buf).await {
        if n == 0 {
            break;
        }
        tail.extend_from_slice(&buf[..n]);
        if tail.len() > cap {
            tail.drain(..tail.len() - cap);
        }
    }
    tail
}
