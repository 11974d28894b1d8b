//! Snapping engine for clip drags.
//!
//! While a clip is dragged, every evaluation derives the candidate snap
//! positions from the current document and reports how far the dragged clip
//! is from the nearest one. Each evaluation corresponds to one render cycle.

use montage_core::limits::SNAP_THRESHOLD;
use montage_core::{Point, Rect};
use montage_timeline::{Clip, Timeline};
use tracing::trace;

use crate::pointer::{PointerBus, PointerSubscription};

/// The clip being dragged, as it was when the drag began.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggingClip {
    pub id: String,
    pub original_position: f64,
    pub original_track: u32,
}

impl DraggingClip {
    pub fn from_clip(clip: &Clip) -> Self {
        Self {
            id: clip.id.clone(),
            original_position: clip.timeline_position,
            original_track: clip.track_index,
        }
    }
}

/// Snap state for one render of an active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapInfo {
    /// Sorted, deduplicated candidate positions.
    pub candidates: Vec<f64>,
    /// Candidate closest to the dragged clip's position.
    pub nearest: f64,
    /// `nearest` when snapping, otherwise `None`.
    pub snap_position: Option<f64>,
    pub is_snapping: bool,
    pub distance_to_snap: f64,
    /// True only on the evaluation where snapping engaged.
    pub just_snapped: bool,
    /// Pointer position relative to the drop surface.
    pub pointer: Point,
}

/// Candidate positions for `dragged`: the timeline origin plus the start and
/// end of every other clip on the same track. Only finite, non-negative
/// values are kept.
pub fn snap_candidates(timeline: &Timeline, dragged: &Clip) -> Vec<f64> {
    let mut candidates: Vec<f64> = std::iter::once(0.0)
        .chain(
            timeline
                .clips_on_track(dragged.track_index)
                .filter(|clip| clip.id != dragged.id)
                .flat_map(|clip| [clip.timeline_position, clip.timeline_end()]),
        )
        .filter(|position| position.is_finite() && *position >= 0.0)
        .collect();
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();
    candidates
}

/// Engine for computing snap targets.
#[derive(Debug)]
pub struct SnapEngine {
    /// Snap distance in timeline seconds.
    pub threshold: f64,
    bus: PointerBus,
    dragging: Option<DraggingClip>,
    subscription: Option<PointerSubscription>,
    surface: Option<Rect>,
    pointer: Point,
    was_snapping: bool,
}

impl SnapEngine {
    pub fn new(bus: PointerBus, threshold: f64) -> Self {
        Self {
            threshold,
            bus,
            dragging: None,
            subscription: None,
            surface: None,
            pointer: Point::ZERO,
            was_snapping: false,
        }
    }

    /// Start a drag and subscribe to pointer moves. A drag already in
    /// progress is ended first.
    pub fn begin_drag(&mut self, dragging: DraggingClip) {
        self.end_drag();
        trace!(clip = %dragging.id, "Drag started");
        self.subscription = Some(self.bus.subscribe());
        self.dragging = Some(dragging);
    }

    /// End the drag and unsubscribe. Returns the drag descriptor, if any.
    pub fn end_drag(&mut self) -> Option<DraggingClip> {
        self.subscription = None;
        self.was_snapping = false;
        let dragging = self.dragging.take();
        if let Some(dragging) = &dragging {
            trace!(clip = %dragging.id, "Drag ended");
        }
        dragging
    }

    pub fn dragging(&self) -> Option<&DraggingClip> {
        self.dragging.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Whether the engine currently holds a pointer subscription.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Bounding rectangle of the drop surface, if it is mounted.
    pub fn set_drop_surface(&mut self, surface: Option<Rect>) {
        self.surface = surface;
    }

    /// Last pointer position relative to the drop surface.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Pull the latest pointer move. Without a surface the move is ignored.
    fn pump_pointer(&mut self) {
        let Some(subscription) = &self.subscription else {
            return;
        };
        if let (Some(event), Some(surface)) = (subscription.latest(), self.surface) {
            self.pointer = surface.to_local(event.client);
        }
    }

    /// Snap state for the current drag, without advancing the pulse.
    pub fn compute(&self, timeline: Option<&Timeline>) -> Option<SnapInfo> {
        let dragging = self.dragging.as_ref()?;
        let timeline = timeline?;
        let clip = timeline.clip(&dragging.id)?;

        let candidates = snap_candidates(timeline, clip);
        let position = clip.timeline_position;
        let (nearest, distance) = candidates
            .iter()
            .map(|&candidate| (candidate, (candidate - position).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0.0, position.abs()));
        let is_snapping = distance <= self.threshold;

        Some(SnapInfo {
            candidates,
            nearest,
            snap_position: is_snapping.then_some(nearest),
            is_snapping,
            distance_to_snap: distance,
            just_snapped: is_snapping && !self.was_snapping,
            pointer: self.pointer,
        })
    }

    /// Evaluate one render cycle: absorb pointer moves, compute snap state
    /// and advance the just-snapped pulse.
    pub fn evaluate(&mut self, timeline: Option<&Timeline>) -> Option<SnapInfo> {
        self.pump_pointer();
        let info = self.compute(timeline);
        self.was_snapping = info.as_ref().is_some_and(|info| info.is_snapping);
        if let Some(info) = &info {
            if info.just_snapped {
                trace!(position = info.nearest, "Snapped");
            }
        }
        info
    }
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(PointerBus::new(), SNAP_THRESHOLD)
    }
}
