//! Text overlays drawn over the composition.

use montage_core::limits::MIN_CLIP_DURATION;
use serde::{Deserialize, Serialize};

use crate::clip::min_span_end;
use crate::keyed::Keyed;

/// Anchor position as fractions of the output frame (0,0 = top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for OverlayPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and color settings for an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_family: String,
    /// Points
    pub font_size: f64,
    pub color: String,
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 48.0,
            color: "#ffffff".to_string(),
            background_color: None,
            bold: false,
            italic: false,
            align: TextAlign::Center,
        }
    }
}

/// A piece of text shown between `start_time` and `end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub position: OverlayPosition,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextOverlay {
    pub fn new(id: impl Into<String>, text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        let mut overlay = Self {
            id: id.into(),
            text: text.into(),
            start_time,
            end_time,
            position: OverlayPosition::default(),
            style: TextStyle::default(),
        };
        overlay.normalize();
        overlay
    }

    /// Keep the display window non-negative and at least `MIN_CLIP_DURATION` long,
    /// and the anchor inside the frame.
    pub fn normalize(&mut self) {
        if !self.start_time.is_finite() {
            self.start_time = 0.0;
        }
        self.start_time = self.start_time.max(0.0);
        if !self.end_time.is_finite() || self.end_time - self.start_time < MIN_CLIP_DURATION {
            self.end_time = min_span_end(self.start_time);
        }
        self.position.x = clamp_unit(self.position.x, 0.5);
        self.position.y = clamp_unit(self.position.y, 0.5);
        if !(self.style.font_size.is_finite() && self.style.font_size > 0.0) {
            self.style.font_size = TextStyle::default().font_size;
        }
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl Keyed for TextOverlay {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A partial update to a text overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextOverlayPatch {
    pub text: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub position: Option<OverlayPosition>,
    pub style: Option<TextStyle>,
}

impl TextOverlayPatch {
    pub fn apply(&self, overlay: &mut TextOverlay) {
        if let Some(text) = &self.text {
            overlay.text.clone_from(text);
        }
        if let Some(start) = self.start_time {
            overlay.start_time = start;
        }
        if let Some(end) = self.end_time {
            overlay.end_time = end;
        }
        if let Some(position) = self.position {
            overlay.position = position;
        }
        if let Some(style) = &self.style {
            overlay.style = style.clone();
        }
        overlay.normalize();
    }
}
