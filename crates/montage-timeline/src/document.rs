//! Invariant-preserving mutation primitives over the timeline.
//!
//! Every operation is a no-op when no timeline is loaded, and reports
//! whether the document actually changed so callers can decide whether the
//! edit is worth a history entry. Invalid requests are clamped or ignored,
//! never reported as errors.

use std::collections::HashSet;

use montage_core::limits::MIN_CLIP_DURATION;
use montage_core::IdSource;
use tracing::{debug, warn};

use crate::clip::{Clip, ClipPatch, Transition, TransitionKind};
use crate::keyed;
use crate::marker::{Marker, MarkerPatch};
use crate::output::OutputPatch;
use crate::overlay::{TextOverlay, TextOverlayPatch};
use crate::timeline::Timeline;
use crate::track::{Track, TrackPatch};

/// Owner of the live timeline, if one is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineDocument {
    timeline: Option<Timeline>,
}

impl TimelineDocument {
    /// Create a document with no timeline loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live timeline.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.timeline.is_some()
    }

    /// Replace the whole document (initial load, reset, undo/redo restore).
    pub fn set_timeline(&mut self, timeline: Option<Timeline>) {
        self.timeline = timeline;
    }

    /// Append a clip, or replace an existing clip with the same id in place.
    pub fn add_clip(&mut self, mut clip: Clip) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        clip.normalize();
        let id = clip.id.clone();
        let changed = keyed::upsert(&mut timeline.clips, clip);
        if changed {
            debug!(clip = %id, "Clip added");
        }
        changed
    }

    /// Merge a patch into a clip and re-apply its invariants.
    pub fn update_clip(&mut self, id: &str, patch: &ClipPatch) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        keyed::update(&mut timeline.clips, id, |clip| patch.apply(clip))
    }

    pub fn remove_clip(&mut self, id: &str) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        let removed = keyed::remove(&mut timeline.clips, id);
        if removed {
            debug!(clip = %id, "Clip removed");
        }
        removed
    }

    /// Re-sequence clips to follow `ordered_ids`.
    ///
    /// Unknown and repeated ids are skipped; clips missing from the list keep
    /// their relative order after the listed ones.
    pub fn reorder_clips<S: AsRef<str>>(&mut self, ordered_ids: &[S]) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };

        let before: Vec<String> = timeline.clips.iter().map(|clip| clip.id.clone()).collect();
        let mut remaining: Vec<Option<Clip>> = timeline.clips.drain(..).map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in ordered_ids {
            let id = id.as_ref();
            if let Some(slot) = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|clip| clip.id == id))
            {
                reordered.extend(slot.take());
            }
        }
        reordered.extend(remaining.into_iter().flatten());

        let changed = before
            .iter()
            .zip(reordered.iter())
            .any(|(id, clip)| *id != clip.id);
        timeline.clips = reordered;
        changed
    }

    /// Split a clip at an absolute timeline time.
    ///
    /// Only splits when `time` lies strictly inside the clip's span and both
    /// pieces are at least `MIN_CLIP_DURATION` long. The left piece keeps the
    /// original id; the right piece gets a fresh id from `ids`, is inserted
    /// directly after the original, and inherits every other property.
    /// Returns the new clip's id.
    pub fn split_clip_at_time(
        &mut self,
        id: &str,
        time: f64,
        ids: &mut dyn IdSource,
    ) -> Option<String> {
        let timeline = self.timeline.as_mut()?;
        let index = timeline.clips.iter().position(|clip| clip.id == id)?;
        let original = &timeline.clips[index];

        if !time.is_finite() || !original.spans_strictly(time) {
            return None;
        }
        let split_point = original.start + (time - original.timeline_position);
        if split_point - original.start < MIN_CLIP_DURATION
            || original.end - split_point < MIN_CLIP_DURATION
        {
            return None;
        }

        let clips = &timeline.clips;
        let Some(fresh) =
            ids.next_unused_id(&|candidate: &str| clips.iter().any(|c| c.id == candidate))
        else {
            warn!(clip = %id, "No unused id for split");
            return None;
        };
        let mut right = timeline.clips[index].clone();
        right.id = fresh;
        right.start = split_point;
        right.timeline_position = time;

        timeline.clips[index].end = split_point;
        let new_id = right.id.clone();
        timeline.clips.insert(index + 1, right);

        debug!(clip = %id, new_clip = %new_id, time, "Clip split");
        Some(new_id)
    }

    pub fn add_marker(&mut self, mut marker: Marker) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        marker.normalize();
        keyed::upsert(&mut timeline.markers, marker)
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        keyed::remove(&mut timeline.markers, id)
    }

    pub fn update_marker(&mut self, id: &str, patch: &MarkerPatch) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        keyed::update(&mut timeline.markers, id, |marker| patch.apply(marker))
    }

    pub fn add_text_overlay(&mut self, mut overlay: TextOverlay) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        overlay.normalize();
        keyed::upsert(&mut timeline.text_overlays, overlay)
    }

    pub fn remove_text_overlay(&mut self, id: &str) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        keyed::remove(&mut timeline.text_overlays, id)
    }

    pub fn update_text_overlay(&mut self, id: &str, patch: &TextOverlayPatch) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        keyed::update(&mut timeline.text_overlays, id, |overlay| patch.apply(overlay))
    }

    /// Upsert track metadata: creates the track at `index` if it does not exist yet.
    pub fn update_track(&mut self, index: u32, patch: &TrackPatch) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        match timeline.tracks.iter_mut().find(|track| track.index == index) {
            Some(track) => {
                let before = track.clone();
                patch.apply(track);
                *track != before
            }
            None => {
                let mut track = Track::new(index);
                patch.apply(&mut track);
                timeline.tracks.push(track);
                debug!(track = index, "Track created");
                true
            }
        }
    }

    pub fn update_output(&mut self, patch: &OutputPatch) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        let before = timeline.output;
        patch.apply(&mut timeline.output);
        timeline.output != before
    }

    /// Set `transition_to_next` on every clip whose id is in `selected`.
    pub fn add_transition_to_selected_clips(
        &mut self,
        selected: &HashSet<String>,
        kind: TransitionKind,
        duration: f64,
    ) -> bool {
        let Some(timeline) = self.timeline.as_mut() else {
            return false;
        };
        let transition = Transition::new(kind, duration);
        let mut changed = false;
        for clip in timeline
            .clips
            .iter_mut()
            .filter(|clip| selected.contains(&clip.id))
        {
            if clip.transition_to_next != Some(transition) {
                clip.transition_to_next = Some(transition);
                changed = true;
            }
        }
        changed
    }
}

impl From<Timeline> for TimelineDocument {
    fn from(timeline: Timeline) -> Self {
        Self {
            timeline: Some(timeline),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
