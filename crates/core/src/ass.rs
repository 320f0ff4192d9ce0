//! Pure conversions for ASS subtitle text: timestamps, colors, escaping.

use crate::error::CoreError;

/// Format seconds as an ASS timestamp: `H:MM:SS.CC`.
///
/// Negative input clamps to zero. Centiseconds are truncated, not rounded,
/// so an event never starts before its source time. The hour field is not
/// zero-padded.
pub fn format_ass_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    // The epsilon absorbs binary float error (0.29 * 100 = 28.999...)
    // without turning truncation into rounding.
    let cs_total = (seconds * 100.0 + 1e-6).floor() as u64;
    let cs = cs_total % 100;
    let total_s = cs_total / 100;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    format!("{h}:{m:02}:{s:02}.{cs:02}")
}

/// Convert a CSS hex color to ASS `&HAABBGGRR` form.
///
/// Accepts `#RGB` or `#RRGGBB`; shorthand is expanded. ASS alpha is
/// inverse: the alpha byte is `round((100 - alpha_pct) * 255 / 100)`.
pub fn css_hex_to_ass(hex: &str, alpha_pct: u8) -> Result<String, CoreError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| CoreError::InvalidColor(hex.to_string()))?;

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(CoreError::InvalidColor(hex.to_string())),
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::InvalidColor(hex.to_string()));
    }

    let rr = &expanded[0..2];
    let gg = &expanded[2..4];
    let bb = &expanded[4..6];
    let alpha_pct = alpha_pct.min(100);
    let alpha = ((100 - alpha_pct) as f64 * 255.0 / 100.0).round() as u8;

    Ok(format!(
        "&H{alpha:02X}{}{}{}",
        bb.to_ascii_uppercase(),
        gg.to_ascii_uppercase(),
        rr.to_ascii_uppercase()
    ))
}

/// Escape ASS override characters in dialogue text.
///
/// Backslashes, braces, and newlines are escaped; carriage returns are
/// dropped. Commas pass through: the `Text` field is the tail of the
/// comma-separated Dialogue row, so they need no escaping.
pub fn escape_ass_text(text: &str) -> String {
    text.replace('\\', r"\\")
        .replace('{', r"\{")
        .replace('}', r"\}")
        .replace('\r', "")
        .replace('\n', r"\N")
}
