//! Render/export settings carried by the document.

use serde::{Deserialize, Serialize};

/// Container format for the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Mp4,
    Webm,
    Mov,
}

impl ContainerFormat {
    /// File extension for this container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mov => "mov",
        }
    }
}

/// Output resolution, frame rate, bitrates and container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: u32,
    pub format: ContainerFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
            video_bitrate_kbps: 8_000,
            audio_bitrate_kbps: 192,
            format: ContainerFormat::Mp4,
        }
    }
}

impl OutputSettings {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub(crate) fn normalize(&mut self) {
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        if !self.fps.is_finite() {
            self.fps = Self::default().fps;
        }
        self.fps = self.fps.max(1.0);
    }
}

/// A partial update to the output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub video_bitrate_kbps: Option<u32>,
    pub audio_bitrate_kbps: Option<u32>,
    pub format: Option<ContainerFormat>,
}

impl OutputPatch {
    pub fn apply(&self, output: &mut OutputSettings) {
        if let Some(width) = self.width {
            output.width = width;
        }
        if let Some(height) = self.height {
            output.height = height;
        }
        if let Some(fps) = self.fps {
            output.fps = fps;
        }
        if let Some(bitrate) = self.video_bitrate_kbps {
            output.video_bitrate_kbps = bitrate;
        }
        if let Some(bitrate) = self.audio_bitrate_kbps {
            output.audio_bitrate_kbps = bitrate;
        }
        if let Some(format) = self.format {
            output.format = format;
        }
        output.normalize();
    }
}
