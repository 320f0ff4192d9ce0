//! ASS document builder.
//!
//! Emits a complete ASS v4+ script from timed segments, a resolved style,
//! and the probed PlayRes. The output is a bit-level contract: `\n` line
//! endings, UTF-8 without BOM, exact section headers, one `Dialogue: 0,`
//! row per segment. Golden tests downstream depend on byte stability.

use std::fmt::Write;

use crate::ass::{css_hex_to_ass, escape_ass_text, format_ass_time};
use crate::error::CoreError;
use crate::segments::Segment;
use crate::style::Style;

/// Build the full ASS script for a burn.
///
/// `segments` must already be sorted and non-overlapping (the segment store
/// guarantees both). `play_res` is the probed source resolution, used
/// verbatim so preview coordinates and burned coordinates share one space.
pub fn build_ass_document(
    segments: &[Segment],
    style: &Style,
    play_res: (u32, u32),
) -> Result<String, CoreError> {
    style.validate()?;
    let (play_res_x, play_res_y) = play_res;

    let primary = css_hex_to_ass(&style.color, style.opacity)?;
    let outline_color = css_hex_to_ass(&style.stroke_color, 100)?;

    let mut doc = String::new();

    // -- [Script Info] -------------------------------------------------------
    // WrapStyle 2 disables wrapping: each segment renders on a single line.
    writeln!(doc, "[Script Info]").unwrap();
    writeln!(doc, "ScriptType: v4.00+").unwrap();
    writeln!(doc, "PlayResX: {play_res_x}").unwrap();
    writeln!(doc, "PlayResY: {play_res_y}").unwrap();
    writeln!(doc, "WrapStyle: 2").unwrap();
    writeln!(doc, "ScaledBorderAndShadow: yes").unwrap();
    writeln!(doc).unwrap();

    // -- [V4+ Styles] --------------------------------------------------------
    writeln!(doc, "[V4+ Styles]").unwrap();
    writeln!(
        doc,
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
         OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, \
         ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, \
         Alignment, MarginL, MarginR, MarginV, Encoding"
    )
    .unwrap();
    writeln!(
        doc,
        "Style: Default,{font},{size},{primary},&H000000FF,{outline_color},&H00000000,\
         {bold},{italic},0,0,100,100,0,0,1,{outline},{shadow},{align},0,0,0,1",
        font = style.font_name(),
        size = style.font_size_px,
        bold = ass_flag(style.bold),
        italic = ass_flag(style.italic),
        outline = style.stroke_px,
        shadow = style.shadow_px,
        align = style.align.to_ass(),
    )
    .unwrap();
    writeln!(doc).unwrap();

    // -- [Events] ------------------------------------------------------------
    writeln!(doc, "[Events]").unwrap();
    writeln!(
        doc,
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
    )
    .unwrap();

    let override_tag = inline_override(style);
    for seg in segments {
        writeln!(
            doc,
            "Dialogue: 0,{start},{end},Default,,0,0,0,,{override_tag}{text}",
            start = format_ass_time(seg.start_s),
            end = format_ass_time(seg.end_s),
            text = escape_ass_text(&seg.text),
        )
        .unwrap();
    }

    Ok(doc)
}

/// `-1` is "true" in the ASS style row.
fn ass_flag(on: bool) -> i8 {
    if on {
        -1
    } else {
        0
    }
}

/// Inline override prefix for each Dialogue row.
///
/// `\pos` pins the anchor to absolute PlayRes coordinates, overriding the
/// style row's alignment; `\frz` rotates about that point. Both live in a
/// single brace pair; no tag is emitted when neither applies.
fn inline_override(style: &Style) -> String {
    let mut tags = String::new();
    if let (Some(x), Some(y)) = (style.pos_x, style.pos_y) {
        write!(tags, "\\pos({},{})", format_coord(x), format_coord(y)).unwrap();
    }
    if style.rotation != 0 {
        write!(tags, "\\frz{}", style.rotation).unwrap();
    }
    if tags.is_empty() {
        tags
    } else {
        format!("{{{tags}}}")
    }
}

/// Render a position coordinate without a trailing `.0` for whole numbers.
fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
