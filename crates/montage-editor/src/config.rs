//! Editor configuration.

use std::time::Duration;

use montage_core::limits;
use montage_core::Result;
use serde::{Deserialize, Serialize};

/// Tunables for an editing session. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots.
    pub history_limit: usize,
    /// Quiet period before a coalesced edit is committed.
    pub coalesce_window_ms: u64,
    /// Snap distance in timeline seconds.
    pub snap_threshold: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_default: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: limits::HISTORY_LIMIT,
            coalesce_window_ms: limits::COALESCE_WINDOW_MS,
            snap_threshold: limits::SNAP_THRESHOLD,
            zoom_min: limits::ZOOM_MIN,
            zoom_max: limits::ZOOM_MAX,
            zoom_default: limits::ZOOM_DEFAULT,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, sanitizing the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Repair values that would make the editor misbehave.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        self.history_limit = self.history_limit.max(1);
        if !self.snap_threshold.is_finite() {
            self.snap_threshold = defaults.snap_threshold;
        }
        self.snap_threshold = self.snap_threshold.max(0.0);
        if !self.zoom_min.is_finite() || self.zoom_min <= 0.0 {
            self.zoom_min = defaults.zoom_min;
        }
        if !self.zoom_max.is_finite() || self.zoom_max <= 0.0 {
            self.zoom_max = defaults.zoom_max;
        }
        if self.zoom_min > self.zoom_max {
            std::mem::swap(&mut self.zoom_min, &mut self.zoom_max);
        }
        if !self.zoom_default.is_finite() {
            self.zoom_default = defaults.zoom_default;
        }
        self.zoom_default = self.zoom_default.clamp(self.zoom_min, self.zoom_max);
        self
    }

    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }

    /// Clamp a requested zoom level into range; non-finite requests get the default.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.zoom_min, self.zoom_max)
        } else {
            self.zoom_default
        }
    }
}
