//! Track metadata.
//!
//! Tracks are sparse: a clip may reference any track index, and metadata
//! for an index only exists once something has been set on it.

use serde::{Deserialize, Serialize};

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
}

fn one() -> f64 {
    1.0
}

/// Per-track settings, keyed by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub index: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: TrackKind,
    /// Is track muted
    #[serde(default)]
    pub muted: bool,
    /// Is track locked (prevent edits)
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "one")]
    pub volume: f64,
}

impl Track {
    /// Create default metadata for a track index.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: None,
            kind: TrackKind::Video,
            muted: false,
            locked: false,
            hidden: false,
            volume: 1.0,
        }
    }

    /// Label shown for the track: its name, or `V<n>`/`A<n>` from its index.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let prefix = match self.kind {
                    TrackKind::Video => 'V',
                    TrackKind::Audio => 'A',
                };
                format!("{prefix}{}", self.index + 1)
            }
        }
    }
}

/// A partial update to a track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackPatch {
    pub name: Option<Option<String>>,
    pub kind: Option<TrackKind>,
    pub muted: Option<bool>,
    pub locked: Option<bool>,
    pub hidden: Option<bool>,
    pub volume: Option<f64>,
}

impl TrackPatch {
    pub fn apply(&self, track: &mut Track) {
        if let Some(name) = &self.name {
            track.name.clone_from(name);
        }
        if let Some(kind) = self.kind {
            track.kind = kind;
        }
        if let Some(muted) = self.muted {
            track.muted = muted;
        }
        if let Some(locked) = self.locked {
            track.locked = locked;
        }
        if let Some(hidden) = self.hidden {
            track.hidden = hidden;
        }
        if let Some(volume) = self.volume {
            if volume.is_finite() {
                track.volume = volume.clamp(0.0, 1.0);
            }
        }
    }
}
