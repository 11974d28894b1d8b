//! The editing session: composition root and action facade.
//!
//! [`EditorSession`] owns the document, history, selection, clipboard and
//! snap engine. Every state-changing action goes through it and is applied
//! in full (document, then history, then selection/clipboard side effects)
//! before it returns. Actions are no-ops when no timeline is loaded.

use montage_core::{Clock, IdSource, Rect, SystemClock, UuidIds};
use montage_timeline::{
    Clip, ClipPatch, Marker, MarkerPatch, OutputPatch, TextOverlay, TextOverlayPatch, Timeline,
    TimelineDocument, TrackPatch, TransitionKind,
};
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardManager;
use crate::config::EditorConfig;
use crate::history::HistoryManager;
use crate::pointer::PointerBus;
use crate::selection::SelectionManager;
use crate::snapping::{DraggingClip, SnapEngine, SnapInfo};

fn clip_key(id: &str) -> String {
    format!("clip:{id}")
}

fn marker_key(id: &str) -> String {
    format!("marker:{id}")
}

fn overlay_key(id: &str) -> String {
    format!("overlay:{id}")
}

// ── Builder ─────────────────────────────────────────────────────

/// Assembles an [`EditorSession`] from its collaborators.
pub struct SessionBuilder {
    config: EditorConfig,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
    pointer_bus: PointerBus,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
            pointer_bus: PointerBus::new(),
        }
    }

    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Pointer stream the snap engine subscribes to while dragging.
    pub fn pointer_bus(mut self, bus: PointerBus) -> Self {
        self.pointer_bus = bus;
        self
    }

    pub fn build(self) -> EditorSession {
        let config = self.config.validated();
        EditorSession {
            history: HistoryManager::new(config.history_limit, config.coalesce_window()),
            snap: SnapEngine::new(self.pointer_bus, config.snap_threshold),
            zoom: config.zoom_default,
            document: TimelineDocument::new(),
            selection: SelectionManager::new(),
            clipboard: ClipboardManager::new(),
            ids: self.ids,
            clock: self.clock,
            current_time: 0.0,
            revision: 0,
            config,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Session ─────────────────────────────────────────────────────

/// One editing session over one timeline.
pub struct EditorSession {
    config: EditorConfig,
    document: TimelineDocument,
    history: HistoryManager,
    selection: SelectionManager,
    clipboard: ClipboardManager,
    snap: SnapEngine,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
    current_time: f64,
    zoom: f64,
    revision: u64,
}

impl EditorSession {
    /// A session with default collaborators and no timeline loaded.
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start editing `timeline` (or nothing), resetting history, selection,
    /// clipboard, drag state and playback position.
    pub fn initialize_editor(&mut self, timeline: Option<Timeline>) {
        let dropped = self.history.cancel_all();
        if dropped > 0 {
            warn!(dropped, "Discarded pending history commits on re-initialize");
        }
        self.snap.end_drag();
        self.history.initialize(timeline.as_ref());
        self.document.set_timeline(timeline);
        self.selection.clear_selection();
        self.clipboard.clear_clipboard();
        self.current_time = 0.0;
        self.touch();
        info!(
            project = self.timeline().map(|t| t.project_id.as_str()).unwrap_or("<none>"),
            clips = self.timeline().map_or(0, |t| t.clips.len()),
            "Editor initialized"
        );
    }

    // ── State access ────────────────────────────────────────────

    pub fn timeline(&self) -> Option<&Timeline> {
        self.document.timeline()
    }

    pub fn document(&self) -> &TimelineDocument {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn clipboard(&self) -> &ClipboardManager {
        &self.clipboard
    }

    pub fn snap_engine(&self) -> &SnapEngine {
        &self.snap
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.document.is_loaded() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.is_loaded() && self.history.can_redo()
    }

    /// Counter bumped whenever the document, selection, clipboard, playhead
    /// or zoom changes. Views re-render when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ── Commit helpers ──────────────────────────────────────────

    fn commit(&mut self) {
        if let Some(timeline) = self.document.timeline() {
            self.history.commit(timeline);
        }
        self.touch();
    }

    fn commit_coalesced(&mut self, key: &str) {
        if let Some(timeline) = self.document.timeline() {
            self.history
                .commit_coalesced(timeline, key, self.clock.now());
        }
        self.touch();
    }

    // ── Clip actions ────────────────────────────────────────────

    pub fn add_clip(&mut self, clip: Clip) -> bool {
        let changed = self.document.add_clip(clip);
        if changed {
            self.commit();
        }
        changed
    }

    /// Patch a clip. Bursts of updates to the same clip coalesce into one
    /// history entry.
    pub fn update_clip(&mut self, id: &str, patch: &ClipPatch) -> bool {
        let changed = self.document.update_clip(id, patch);
        if changed {
            self.commit_coalesced(&clip_key(id));
        }
        changed
    }

    /// Remove a clip and drop it from the selection.
    pub fn remove_clip(&mut self, id: &str) -> bool {
        let changed = self.document.remove_clip(id);
        if changed {
            self.commit();
        }
        if self.selection.deselect(id) {
            self.touch();
        }
        changed
    }

    pub fn reorder_clips<S: AsRef<str>>(&mut self, ordered_ids: &[S]) -> bool {
        let changed = self.document.reorder_clips(ordered_ids);
        if changed {
            self.commit();
        }
        changed
    }

    /// Split a clip at an absolute timeline time. Returns the new right-hand clip's id.
    pub fn split_clip_at_time(&mut self, id: &str, time: f64) -> Option<String> {
        let new_id = self
            .document
            .split_clip_at_time(id, time, self.ids.as_mut())?;
        self.commit();
        Some(new_id)
    }

    /// Set a transition on every selected clip.
    pub fn add_transition_to_selected_clips(&mut self, kind: TransitionKind, duration: f64) -> bool {
        let changed =
            self.document
                .add_transition_to_selected_clips(self.selection.ids(), kind, duration);
        if changed {
            self.commit();
        }
        changed
    }

    /// Remove every selected clip as one history entry.
    pub fn remove_selected_clips(&mut self) -> usize {
        let ids: Vec<String> = self.selection.ids().iter().cloned().collect();
        let removed = ids
            .iter()
            .filter(|id| self.document.remove_clip(id))
            .count();
        if self.selection.clear_selection() {
            self.touch();
        }
        if removed > 0 {
            self.commit();
        }
        removed
    }

    // ── Markers & overlays ──────────────────────────────────────

    pub fn add_marker(&mut self, marker: Marker) -> bool {
        let changed = self.document.add_marker(marker);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        let changed = self.document.remove_marker(id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn update_marker(&mut self, id: &str, patch: &MarkerPatch) -> bool {
        let changed = self.document.update_marker(id, patch);
        if changed {
            self.commit_coalesced(&marker_key(id));
        }
        changed
    }

    pub fn add_text_overlay(&mut self, overlay: TextOverlay) -> bool {
        let changed = self.document.add_text_overlay(overlay);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn remove_text_overlay(&mut self, id: &str) -> bool {
        let changed = self.document.remove_text_overlay(id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn update_text_overlay(&mut self, id: &str, patch: &TextOverlayPatch) -> bool {
        let changed = self.document.update_text_overlay(id, patch);
        if changed {
            self.commit_coalesced(&overlay_key(id));
        }
        changed
    }

    // ── Tracks & output ─────────────────────────────────────────

    pub fn update_track(&mut self, index: u32, patch: &TrackPatch) -> bool {
        let changed = self.document.update_track(index, patch);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn update_output(&mut self, patch: &OutputPatch) -> bool {
        let changed = self.document.update_output(patch);
        if changed {
            self.commit();
        }
        changed
    }

    // ── Selection ───────────────────────────────────────────────

    pub fn select_clip(&mut self, id: &str, multi: bool) {
        if self.document.is_loaded() && self.selection.select_clip(id, multi) {
            self.touch();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear_selection() {
            self.touch();
        }
    }

    /// Select every clip in the document.
    pub fn select_all(&mut self) {
        let Some(timeline) = self.document.timeline() else {
            return;
        };
        if self
            .selection
            .replace(timeline.clips.iter().map(|clip| clip.id.clone()))
        {
            self.touch();
        }
    }

    // ── Clipboard ───────────────────────────────────────────────

    /// Copy the selected clips, in document order. Returns how many were copied.
    pub fn copy_selected_clips(&mut self) -> usize {
        let Some(timeline) = self.document.timeline() else {
            return 0;
        };
        let copied: Vec<Clip> = timeline
            .clips
            .iter()
            .filter(|clip| self.selection.is_selected(&clip.id))
            .cloned()
            .collect();
        if copied.as_slice() != self.clipboard.clips() {
            self.touch();
        }
        self.clipboard.copy_clips(&copied)
    }

    /// Paste the clipboard at the playhead, select exactly the pasted clips,
    /// and commit one history entry. Returns the new clip ids.
    pub fn paste_clips_at_current_time(&mut self) -> Vec<String> {
        if !self.document.is_loaded() {
            return Vec::new();
        }
        let document = &self.document;
        let pasted = self.clipboard.paste_clips(
            self.current_time,
            self.ids.as_mut(),
            |id| document.timeline().is_some_and(|t| t.contains_clip(id)),
        );
        if pasted.is_empty() {
            return Vec::new();
        }

        let ids: Vec<String> = pasted.iter().map(|clip| clip.id.clone()).collect();
        for clip in pasted {
            self.document.add_clip(clip);
        }
        self.selection.replace(ids.iter().cloned());
        self.commit();
        debug!(clips = ids.len(), at = self.current_time, "Pasted clips");
        ids
    }

    // ── Undo / redo ─────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if !self.document.is_loaded() {
            return false;
        }
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.document.is_loaded() {
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Replace the live document with a snapshot and drop stale selections.
    fn restore(&mut self, snapshot: &Timeline) {
        self.document.set_timeline(Some(snapshot.clone()));
        self.touch();
        let stale = self.selection.retain_existing(snapshot);
        if stale > 0 {
            debug!(stale, "Deselected clips missing after restore");
        }
    }

    // ── Playback & zoom ─────────────────────────────────────────

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if time != self.current_time {
            self.current_time = time;
            self.touch();
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped into the configured range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let zoom = self.config.clamp_zoom(zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.touch();
        }
        self.zoom
    }

    // ── Dragging ────────────────────────────────────────────────

    /// Begin dragging a clip. Returns false if the clip does not exist.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        let Some(clip) = self.document.timeline().and_then(|t| t.clip(id)) else {
            return false;
        };
        let dragging = DraggingClip::from_clip(clip);
        self.snap.begin_drag(dragging);
        true
    }

    /// Move the dragged clip. Coalesced like any other clip update.
    pub fn drag_to(&mut self, track_index: u32, timeline_position: f64) -> bool {
        let Some(id) = self.snap.dragging().map(|d| d.id.clone()) else {
            return false;
        };
        self.update_clip(&id, &ClipPatch::placement(track_index, timeline_position))
    }

    /// Drop the dragged clip, locking it onto the snap position if currently
    /// snapping, and commit the drag immediately.
    pub fn end_drag(&mut self) -> bool {
        let snapped = self
            .snap
            .compute(self.document.timeline())
            .and_then(|info| info.snap_position);
        let Some(dragging) = self.snap.end_drag() else {
            return false;
        };
        if let Some(position) = snapped {
            self.update_clip(&dragging.id, &ClipPatch::position(position));
        }
        self.history.flush_all();
        true
    }

    /// Abort the drag, putting the clip back where it started.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(dragging) = self.snap.end_drag() else {
            return false;
        };
        self.update_clip(
            &dragging.id,
            &ClipPatch::placement(dragging.original_track, dragging.original_position),
        );
        self.history.flush_all();
        true
    }

    pub fn set_drop_surface(&mut self, surface: Option<Rect>) {
        self.snap.set_drop_surface(surface);
    }

    /// Evaluate snapping for this render. `None` unless a drag is active on
    /// a clip that still exists.
    pub fn snap_info(&mut self) -> Option<SnapInfo> {
        self.snap.evaluate(self.document.timeline())
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Commit coalesced edits whose quiet period has elapsed. Call once per frame.
    pub fn tick(&mut self) -> usize {
        self.history.poll(self.clock.now())
    }

    /// End the session cleanly: commit pending edits and release the pointer.
    pub fn shutdown(&mut self) {
        let flushed = self.history.flush_all();
        self.snap.end_drag();
        info!(flushed, "Editor session shut down");
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        let dropped = self.history.cancel_all();
        if dropped > 0 {
            warn!(dropped, "Editor session dropped with pending history commits");
        }
        self.snap.end_drag();
    }
}

// ── Tests ───────────────────────────────────────────────────────
