//! FFprobe wrapper: resolves a source video's native resolution.
//!
//! The probed `(width, height)` becomes the ASS `PlayResX`/`PlayResY` and
//! the scale basis the browser preview uses when converting CSS pixels to
//! subtitle-space coordinates. Preview and burn stay pixel-aligned only
//! because both read the same pair from here.

use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;

/// Resolution assumed when the probe yields nothing usable.
pub const FALLBACK_RESOLUTION: (u32, u32) = (1920, 1080);

/// Top-level ffprobe JSON output (`-show_entries stream=width,height -of json`).
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe the first video stream's width and height.
///
/// Failures degrade rather than abort: a probe that exits non-zero or emits
/// unparseable JSON falls back to scanning its output for textual
/// width/height values, and finally to [`FALLBACK_RESOLUTION`]. Only a
/// missing source file is an error.
pub async fn probe_resolution(probe_bin: &str, path: &Path) -> Result<(u32, u32), CoreError> {
    if !path.exists() {
        return Err(CoreError::NotFound {
            entity: "Source video",
            id: path.to_string_lossy().into_owned(),
        });
    }

    let output = tokio::process::Command::new(probe_bin)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(%err, probe_bin, "probe binary failed to launch, using fallback resolution");
            return Ok(FALLBACK_RESOLUTION);
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        if let Some(dims) = parse_probe_json(&stdout) {
            return Ok(dims);
        }
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if let Some(dims) = parse_dimensions_loose(&stdout).or_else(|| parse_dimensions_loose(&stderr))
    {
        tracing::warn!(
            ?dims,
            "probe JSON unusable, recovered dimensions from raw output"
        );
        return Ok(dims);
    }

    tracing::warn!(
        exit = ?output.status.code(),
        "probe yielded no dimensions, using fallback resolution"
    );
    Ok(FALLBACK_RESOLUTION)
}

/// Probe the media duration in seconds, if reported.
pub async fn probe_duration(probe_bin: &str, path: &Path) -> Result<Option<f64>, CoreError> {
    if !path.exists() {
        return Err(CoreError::NotFound {
            entity: "Source video",
            id: path.to_string_lossy().into_owned(),
        });
    }

    let output = tokio::process::Command::new(probe_bin)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration:stream=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .await
        .map_err(CoreError::Io)?;

    if !output.status.success() {
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: FfprobeOutput = match serde_json::from_str(&stdout) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(None),
    };

    let format_duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());
    let stream_duration = parsed
        .streams
        .iter()
        .find_map(|s| s.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    Ok(format_duration.or(stream_duration))
}

fn parse_probe_json(stdout: &str) -> Option<(u32, u32)> {
    let parsed: FfprobeOutput = serde_json::from_str(stdout).ok()?;
    let stream = parsed.streams.first()?;
    match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    }
}

/// Last-resort scan for `width=N` / `"width": N` style pairs in raw probe
/// output.
fn parse_dimensions_loose(text: &str) -> Option<(u32, u32)> {
    let width = number_after_keyword(text, "width")?;
    let height = number_after_keyword(text, "height")?;
    (width > 0 && height > 0).then_some((width, height))
}

fn number_after_keyword(text: &str, keyword: &str) -> Option<u32> {
    let idx = text.find(keyword)?;
    let rest = &text[idx + keyword.len()..];
    let digits: String = rest
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_parses_first_stream() {
        let json = r#"{"streams": [{"width": 1280, "height": 720}]}"#;
        assert_eq!(parse_probe_json(json), Some((1280, 720)));
    }

    #[test]
    fn json_without_streams_is_unusable() {
        assert_eq!(parse_probe_json(r#"{"streams": []}"#), None);
        assert_eq!(parse_probe_json("not json"), None);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let json = r#"{"streams": [{"width": 0, "height": 1080}]}"#;
        assert_eq!(parse_probe_json(json), None);
    }

    #[test]
    fn loose_scan_reads_key_value_text() {
        assert_eq!(
            parse_dimensions_loose("width=640\nheight=480\n"),
            Some((640, 480))
        );
    }

    #[test]
    fn loose_scan_reads_broken_json() {
        assert_eq!(
            parse_dimensions_loose(r#"..."width": 3840, "height": 2160,"#),
            Some((3840, 2160))
        );
    }

    #[test]
    fn loose_scan_needs_both_dimensions() {
        assert_eq!(parse_dimensions_loose("width=640"), None);
        assert_eq!(parse_dimensions_loose("no numbers here"), None);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = probe_resolution("ffprobe", Path::new("/nonexistent/clip.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
