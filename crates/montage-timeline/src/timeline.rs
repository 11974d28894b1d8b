//! The timeline document value.

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::marker::Marker;
use crate::output::OutputSettings;
use crate::overlay::TextOverlay;
use crate::track::Track;

/// A full composition: clips, tracks, markers, text overlays and output settings.
///
/// `clips` keeps explicit insertion order, not time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub project_id: String,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub text_overlays: Vec<TextOverlay>,
    /// Sparse track metadata, one entry per touched index.
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Timeline {
    /// Create an empty timeline for a project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            clips: Vec::new(),
            markers: Vec::new(),
            text_overlays: Vec::new(),
            tracks: Vec::new(),
            output: OutputSettings::default(),
        }
    }

    /// Get a clip by id.
    pub fn clip(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    /// Get a clip mutably by id.
    pub fn clip_mut(&mut self, id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|clip| clip.id == id)
    }

    /// Whether a clip with this id exists.
    pub fn contains_clip(&self, id: &str) -> bool {
        self.clip(id).is_some()
    }

    /// Clips on one track, in document order.
    pub fn clips_on_track(&self, track_index: u32) -> impl Iterator<Item = &Clip> {
        self.clips
            .iter()
            .filter(move |clip| clip.track_index == track_index)
    }

    /// Get track metadata by index.
    pub fn track(&self, index: u32) -> Option<&Track> {
        self.tracks.iter().find(|track| track.index == index)
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.id == id)
    }

    pub fn text_overlay(&self, id: &str) -> Option<&TextOverlay> {
        self.text_overlays.iter().find(|overlay| overlay.id == id)
    }

    /// End of the last clip on the timeline, 0 when empty.
    pub fn duration(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::timeline_end)
            .fold(0.0, f64::max)
    }

    /// Highest track index referenced by a clip or track entry.
    pub fn max_track_index(&self) -> Option<u32> {
        self.clips
            .iter()
            .map(|clip| clip.track_index)
            .chain(self.tracks.iter().map(|track| track.index))
            .max()
    }
}
