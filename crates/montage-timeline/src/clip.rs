//! Clip types for the timeline.

use montage_core::limits::MIN_CLIP_DURATION;
use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;

/// Crop rectangle, as fractions of the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Transition styles available between adjacent clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    Fade,
    CrossDissolve,
    DipToBlack,
    DipToWhite,
    Wipe,
    Push,
    Iris,
}

/// Transition into whatever clip follows this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    /// Duration in seconds.
    pub duration: f64,
}

impl Transition {
    /// Create a transition; the duration is clamped to a finite, non-negative value.
    pub fn new(kind: TransitionKind, duration: f64) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        Self { kind, duration }
    }
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// A clip on the timeline.
///
/// `start`/`end` are trim bounds in seconds into the source media;
/// `timeline_position` is where the trimmed span sits on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: String,
    /// Opaque reference to the source asset
    pub asset_id: String,
    /// Trim in point (seconds into source)
    pub start: f64,
    /// Trim out point (seconds into source)
    pub end: f64,
    /// Source length, unknown until asset metadata resolves
    #[serde(default)]
    pub source_duration: Option<f64>,
    /// Start on the timeline (seconds)
    #[serde(default)]
    pub timeline_position: f64,
    #[serde(default)]
    pub track_index: u32,
    #[serde(default)]
    pub crop: Option<Crop>,
    #[serde(default)]
    pub transition_to_next: Option<Transition>,
    /// Linear gain, 0..=1
    #[serde(default = "one")]
    pub volume: f64,
    /// 0..=1
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default)]
    pub muted: bool,
    /// Playback rate (1.0 = normal)
    #[serde(default = "one")]
    pub speed: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "yes")]
    pub has_audio: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Clip {
    /// Create a new clip trimmed to `[start, end]` of an asset, at timeline position 0 on track 0.
    pub fn new(id: impl Into<String>, asset_id: impl Into<String>, start: f64, end: f64) -> Self {
        let mut clip = Self {
            id: id.into(),
            asset_id: asset_id.into(),
            start,
            end,
            source_duration: None,
            timeline_position: 0.0,
            track_index: 0,
            crop: None,
            transition_to_next: None,
            volume: 1.0,
            opacity: 1.0,
            muted: false,
            speed: 1.0,
            locked: false,
            has_audio: true,
            preview_url: None,
            thumbnail_url: None,
        };
        clip.normalize();
        clip
    }

    /// Place the clip at a timeline position.
    pub fn at(mut self, position: f64) -> Self {
        self.timeline_position = position;
        self.normalize();
        self
    }

    /// Move the clip to a track.
    pub fn on_track(mut self, track_index: u32) -> Self {
        self.track_index = track_index;
        self
    }

    /// Attach known source metadata.
    pub fn with_source_duration(mut self, duration: f64) -> Self {
        self.source_duration = Some(duration);
        self.normalize();
        self
    }

    /// Trimmed length in seconds.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Timeline time at which the clip ends.
    #[inline]
    pub fn timeline_end(&self) -> f64 {
        self.timeline_position + self.duration()
    }

    /// Whether `time` falls strictly inside the clip's timeline span.
    pub fn spans_strictly(&self, time: f64) -> bool {
        time > self.timeline_position && time < self.timeline_end()
    }

    /// Re-establish every clip invariant.
    ///
    /// - a non-finite `source_duration` becomes `None`
    /// - `start >= 0`, `timeline_position >= 0`
    /// - with a known source length, trim bounds lie in `[0, max(len, MIN_CLIP_DURATION)]`
    /// - `end - start >= MIN_CLIP_DURATION`
    pub fn normalize(&mut self) {
        if matches!(self.source_duration, Some(d) if !d.is_finite()) {
            self.source_duration = None;
        }

        if !self.start.is_finite() {
            self.start = 0.0;
        }
        self.start = self.start.max(0.0);
        if !self.end.is_finite() {
            self.end = min_span_end(self.start);
        }

        let limit = self
            .source_duration
            .filter(|d| *d >= 0.0)
            .map(|d| d.max(MIN_CLIP_DURATION));

        if let Some(limit) = limit {
            self.start = self.start.min(limit);
            self.end = self.end.clamp(0.0, limit);
        }

        if self.end - self.start < MIN_CLIP_DURATION {
            self.end = min_span_end(self.start);
            if let Some(limit) = limit {
                if self.end > limit {
                    self.end = limit;
                    self.start = max_span_start(limit);
                }
            }
        }

        self.timeline_position = finite_or(self.timeline_position, 0.0).max(0.0);
        self.volume = finite_or(self.volume, 1.0).clamp(0.0, 1.0);
        self.opacity = finite_or(self.opacity, 1.0).clamp(0.0, 1.0);
        if !(self.speed.is_finite() && self.speed > 0.0) {
            self.speed = 1.0;
        }
        if let Some(transition) = self.transition_to_next {
            self.transition_to_next = Some(Transition::new(transition.kind, transition.duration));
        }
    }
}

impl Keyed for Clip {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Smallest end at or after `start + MIN_CLIP_DURATION` whose computed gap
/// from `start` is at least `MIN_CLIP_DURATION`. `start` must be finite and non-negative.
pub(crate) fn min_span_end(start: f64) -> f64 {
    let mut end = start + MIN_CLIP_DURATION;
    while end.is_finite() && end - start < MIN_CLIP_DURATION {
        end = f64::from_bits(end.to_bits() + 1);
    }
    end
}

/// Largest non-negative start whose computed gap to `end` is at least
/// `MIN_CLIP_DURATION`. `end` must be at least `MIN_CLIP_DURATION`.
fn max_span_start(end: f64) -> f64 {
    let mut start = (end - MIN_CLIP_DURATION).max(0.0);
    while start > 0.0 && end - start < MIN_CLIP_DURATION {
        start = f64::from_bits(start.to_bits() - 1);
    }
    start
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// A partial update to a clip. `None` leaves the field untouched.
///
/// Nullable fields use a nested option: `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClipPatch {
    pub asset_id: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub source_duration: Option<Option<f64>>,
    pub timeline_position: Option<f64>,
    pub track_index: Option<u32>,
    pub crop: Option<Option<Crop>>,
    pub transition_to_next: Option<Option<Transition>>,
    pub volume: Option<f64>,
    pub opacity: Option<f64>,
    pub muted: Option<bool>,
    pub speed: Option<f64>,
    pub locked: Option<bool>,
    pub has_audio: Option<bool>,
    pub preview_url: Option<Option<String>>,
    pub thumbnail_url: Option<Option<String>>,
}

impl ClipPatch {
    /// Patch that only moves the clip.
    pub fn position(timeline_position: f64) -> Self {
        Self {
            timeline_position: Some(timeline_position),
            ..Self::default()
        }
    }

    /// Patch that moves the clip to a track and position.
    pub fn placement(track_index: u32, timeline_position: f64) -> Self {
        Self {
            track_index: Some(track_index),
            timeline_position: Some(timeline_position),
            ..Self::default()
        }
    }

    /// Patch that sets both trim bounds.
    pub fn trim(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Merge the patch into `clip` and re-apply clip invariants.
    pub fn apply(&self, clip: &mut Clip) {
        if let Some(asset_id) = &self.asset_id {
            clip.asset_id.clone_from(asset_id);
        }
        if let Some(start) = self.start {
            clip.start = start;
        }
        if let Some(end) = self.end {
            clip.end = end;
        }
        if let Some(source_duration) = self.source_duration {
            clip.source_duration = source_duration;
        }
        if let Some(position) = self.timeline_position {
            clip.timeline_position = position;
        }
        if let Some(track_index) = self.track_index {
            clip.track_index = track_index;
        }
        if let Some(crop) = self.crop {
            clip.crop = crop;
        }
        if let Some(transition) = self.transition_to_next {
            clip.transition_to_next = transition;
        }
        if let Some(volume) = self.volume {
            clip.volume = volume;
        }
        if let Some(opacity) = self.opacity {
            clip.opacity = opacity;
        }
        if let Some(muted) = self.muted {
            clip.muted = muted;
        }
        if let Some(speed) = self.speed {
            clip.speed = speed;
        }
        if let Some(locked) = self.locked {
            clip.locked = locked;
        }
        if let Some(has_audio) = self.has_audio {
            clip.has_audio = has_audio;
        }
        if let Some(preview_url) = &self.preview_url {
            clip.preview_url.clone_from(preview_url);
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            clip.thumbnail_url.clone_from(thumbnail_url);
        }
        clip.normalize();
    }
}

// ── Tests ───────────────────────────────────────────────────────
