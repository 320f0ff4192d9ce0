//! Subtitle style descriptor.
//!
//! Style arrives as an open bag of optional JSON fields from the client;
//! it is modelled as a closed record with defaults applied at the
//! deserialization boundary. Unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Font families with bundled files; anything else fails validation.
pub const FONT_FAMILIES: &[&str] = &["Inter", "Arial", "Georgia", "Helvetica", "Times New Roman"];

/// Allowed font sizes, in PlayRes units.
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 8..=200;

/// Named shorthand for font size / outline combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    Default,
    Karaoke,
    Minimal,
}

impl StylePreset {
    /// The `(font_size_px, stroke_px)` pair this preset stands for.
    fn size_and_outline(self) -> (u32, u32) {
        match self {
            StylePreset::Default => (28, 3),
            StylePreset::Karaoke => (36, 4),
            StylePreset::Minimal => (22, 0),
        }
    }
}

/// Subtitle anchor, mapped onto the ASS numpad alignment codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    BottomLeft,
    BottomCenter,
    BottomRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    TopLeft,
    TopCenter,
    TopRight,
}

impl Align {
    /// ASS `Alignment` uses numpad coordinates: 1-3 bottom, 4-6 middle,
    /// 7-9 top, left-to-right within each row.
    pub fn to_ass(self) -> u8 {
        match self {
            Align::BottomLeft => 1,
            Align::BottomCenter => 2,
            Align::BottomRight => 3,
            Align::MiddleLeft => 4,
            Align::MiddleCenter => 5,
            Align::MiddleRight => 6,
            Align::TopLeft => 7,
            Align::TopCenter => 8,
            Align::TopRight => 9,
        }
    }
}

/// Typographic rendering parameters for a burn request.
///
/// Field semantics and defaults:
///
/// | field             | default         | effect                              |
/// |-------------------|-----------------|-------------------------------------|
/// | `preset`          | `default`       | shorthand for size/outline          |
/// | `font_family`     | `Inter`         | must resolve to a bundled font      |
/// | `font_size_px`    | `28`            | size in PlayRes units               |
/// | `color`           | `#FFFFFF`       | primary fill                        |
/// | `bold`/`italic`   | `false`         | weight / slant                      |
/// | `stroke_px`       | `3`             | outline thickness                   |
/// | `stroke_color`    | `#000000`       | outline colour                      |
/// | `align`           | `bottom-center` | anchor                              |
/// | `pos_x`/`pos_y`   | `null`          | absolute PlayRes position           |
/// | `max_width_pct`   | `90`            | advisory only; ASS does not wrap    |
/// | `outline_samples` | `16`            | preview-only; ignored by renderer   |
/// | `opacity`         | `100`           | alpha applied to primary fill       |
/// | `rotation`        | `0`             | degrees, ASS `\frz`                 |
/// | `shadow_px`       | `0`             | always rendered as zero             |
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StyleInput")]
pub struct Style {
    pub preset: StylePreset,
    pub font_family: String,
    pub font_size_px: u32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub stroke_px: u32,
    pub stroke_color: String,
    pub align: Align,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub max_width_pct: u32,
    pub outline_samples: u32,
    pub opacity: u8,
    pub rotation: u32,
    pub shadow_px: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            preset: StylePreset::Default,
            font_family: "Inter".into(),
            font_size_px: 28,
            color: "#FFFFFF".into(),
            bold: false,
            italic: false,
            stroke_px: 3,
            stroke_color: "#000000".into(),
            align: Align::BottomCenter,
            pos_x: None,
            pos_y: None,
            max_width_pct: 90,
            outline_samples: 16,
            opacity: 100,
            rotation: 0,
            shadow_px: 0,
        }
    }
}

/// The style as it arrives on the wire: every field optional.
///
/// `Style` deserializes through this shadow so the preset shorthand can
/// tell an absent field from an explicit value — `{"preset": "karaoke",
/// "font_size_px": 28}` means 28, not karaoke's 36. The presence
/// information only exists at JSON-parse time, so the fill happens here
/// and nowhere else.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleInput {
    preset: Option<StylePreset>,
    font_family: Option<String>,
    font_size_px: Option<u32>,
    color: Option<String>,
    bold: Option<bool>,
    italic: Option<bool>,
    stroke_px: Option<u32>,
    stroke_color: Option<String>,
    align: Option<Align>,
    pos_x: Option<f64>,
    pos_y: Option<f64>,
    max_width_pct: Option<u32>,
    outline_samples: Option<u32>,
    opacity: Option<u8>,
    rotation: Option<u32>,
    shadow_px: Option<u32>,
}

impl From<StyleInput> for Style {
    fn from(input: StyleInput) -> Self {
        let preset = input.preset.unwrap_or(StylePreset::Default);
        let (preset_size, preset_stroke) = preset.size_and_outline();
        Style {
            preset,
            font_family: input.font_family.unwrap_or_else(|| "Inter".into()),
            font_size_px: input.font_size_px.unwrap_or(preset_size),
            color: input.color.unwrap_or_else(|| "#FFFFFF".into()),
            bold: input.bold.unwrap_or(false),
            italic: input.italic.unwrap_or(false),
            stroke_px: input.stroke_px.unwrap_or(preset_stroke),
            stroke_color: input.stroke_color.unwrap_or_else(|| "#000000".into()),
            align: input.align.unwrap_or(Align::BottomCenter),
            pos_x: input.pos_x,
            pos_y: input.pos_y,
            max_width_pct: input.max_width_pct.unwrap_or(90),
            outline_samples: input.outline_samples.unwrap_or(16),
            opacity: input.opacity.unwrap_or(100),
            rotation: input.rotation.unwrap_or(0),
            shadow_px: input.shadow_px.unwrap_or(0),
        }
    }
}

impl Style {
    /// Check every field against its documented bounds.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !FONT_FAMILIES.contains(&self.font_family.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown font_family '{}'. Bundled fonts: {}",
                self.font_family,
                FONT_FAMILIES.join(", ")
            )));
        }
        if !FONT_SIZE_RANGE.contains(&self.font_size_px) {
            return Err(CoreError::Validation(format!(
                "font_size_px must be within {:?}, got {}",
                FONT_SIZE_RANGE, self.font_size_px
            )));
        }
        if self.stroke_px > 16 {
            return Err(CoreError::Validation(format!(
                "stroke_px must be <= 16, got {}",
                self.stroke_px
            )));
        }
        if !(10..=100).contains(&self.max_width_pct) {
            return Err(CoreError::Validation(format!(
                "max_width_pct must be within 10..=100, got {}",
                self.max_width_pct
            )));
        }
        if self.opacity > 100 {
            return Err(CoreError::Validation(format!(
                "opacity must be <= 100, got {}",
                self.opacity
            )));
        }
        if self.rotation > 359 {
            return Err(CoreError::Validation(format!(
                "rotation must be within 0..=359, got {}",
                self.rotation
            )));
        }
        if self.pos_x.is_some() != self.pos_y.is_some() {
            return Err(CoreError::Validation(
                "pos_x and pos_y must be set together".into(),
            ));
        }
        // Surface color errors at validation time rather than mid-build.
        crate::ass::css_hex_to_ass(&self.color, self.opacity)?;
        crate::ass::css_hex_to_ass(&self.stroke_color, 100)?;
        Ok(())
    }

    /// ASS font name, with the variant suffix libass uses to pick the
    /// bundled Bold/Italic files.
    pub fn font_name(&self) -> String {
        match (self.bold, self.italic) {
            (true, true) => format!("{} Bold Italic", self.font_family),
            (true, false) => format!("{} Bold", self.font_family),
            (false, true) => format!("{} Italic", self.font_family),
            (false, false) => self.font_family.clone(),
        }
    }
}
