//! External speech-to-text invocation.
//!
//! The transcriber is a collaborator: any binary that reads a media file
//! and prints whisper-style JSON (`{"segments": [{start, end, text}]}`) to
//! stdout. Its raw output is repaired by
//! [`crate::segments::normalize_transcription`] before anything is stored.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;

use crate::error::CoreError;
use crate::segments::RawSegment;

/// Whisper-style transcriber output.
#[derive(Debug, Deserialize)]
struct TranscriberOutput {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

/// Run the configured transcriber over a media file and collect its raw
/// segments.
pub async fn run_transcriber(
    transcribe_bin: &str,
    media: &Path,
) -> Result<Vec<RawSegment>, CoreError> {
    let output = tokio::process::Command::new(transcribe_bin)
        .arg(media)
        .arg("--output-json")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| CoreError::Internal(format!("failed to launch transcriber: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let snippet: String = stderr.chars().take(500).collect();
        return Err(CoreError::Internal(format!(
            "transcriber exited with {}: {snippet}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_transcriber_json(&stdout)
}

fn parse_transcriber_json(stdout: &str) -> Result<Vec<RawSegment>, CoreError> {
    let parsed: TranscriberOutput = serde_json::from_str(stdout.trim())
        .map_err(|e| CoreError::Internal(format!("unparseable transcriber output: {e}")))?;
    Ok(parsed.segments)
}
