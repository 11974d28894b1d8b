//! End-to-end editing flows through the session facade.
//!
//! Exercises montage-editor on top of montage-timeline documents with a
//! deterministic clock and id source.

use std::time::Duration;

use montage_core::{ManualClock, Rect, SequentialIds};
use montage_editor::{EditorConfig, EditorSession, PointerBus};
use montage_timeline::{Clip, ClipPatch, Marker, Timeline, TrackPatch, TransitionKind};

// ── Helpers ────────────────────────────────────────────────────

fn clip(id: &str, position: f64, track: u32) -> Clip {
    Clip::new(id, "media/test.mp4", 0.0, 10.0)
        .with_source_duration(10.0)
        .at(position)
        .on_track(track)
}

fn open(timeline: Timeline) -> (EditorSession, ManualClock) {
    let clock = ManualClock::new();
    let mut session = EditorSession::builder()
        .ids(SequentialIds::new("gen-"))
        .clock(clock.clone())
        .build();
    session.initialize_editor(Some(timeline));
    (session, clock)
}

fn three_clip_timeline() -> Timeline {
    let mut timeline = Timeline::new("integration");
    timeline.clips.push(clip("intro", 0.0, 0));
    timeline.clips.push(clip("body", 10.0, 0));
    timeline.clips.push(clip("music", 0.0, 1));
    timeline
}

fn position(session: &EditorSession, id: &str) -> f64 {
    session
        .timeline()
        .and_then(|t| t.clip(id))
        .map(|clip| clip.timeline_position)
        .unwrap()
}

// ── Split / undo ───────────────────────────────────────────────

#[test]
fn split_then_undo_restores_single_clip() {
    let (mut session, _) = open(three_clip_timeline());
    let new_id = session.split_clip_at_time("body", 15.0).unwrap();

    let timeline = session.timeline().unwrap();
    let left = timeline.clip("body").unwrap();
    let right = timeline.clip(&new_id).unwrap();
    assert_eq!(left.end, 5.0);
    assert_eq!(right.start, 5.0);
    assert_eq!(right.timeline_position, 15.0);
    assert_eq!(left.timeline_end(), right.timeline_position);

    let order: Vec<&str> = timeline.clips.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, ["intro", "body", new_id.as_str(), "music"]);

    assert!(session.undo());
    assert_eq!(session.timeline().unwrap().clips.len(), 3);
    assert!(session.redo());
    assert_eq!(session.timeline().unwrap().clips.len(), 4);
}

#[test]
fn split_outside_span_is_noop() {
    let (mut session, _) = open(three_clip_timeline());
    let len = session.history().len();
    for time in [-1.0, 9.99, 10.0, 10.05, 19.95, 20.0, 25.0, f64::INFINITY] {
        assert!(session.split_clip_at_time("body", time).is_none(), "t={time}");
    }
    assert_eq!(session.history().len(), len);
}

#[test]
fn split_after_reload_does_not_reuse_document_ids() {
    let mut timeline = three_clip_timeline();
    timeline.clips.push(clip("gen-1", 40.0, 0));
    let (mut session, _) = open(timeline);

    let new_id = session.split_clip_at_time("body", 15.0).unwrap();
    assert_eq!(new_id, "gen-2");
    assert_eq!(position(&session, "gen-1"), 40.0);
    assert_eq!(session.timeline().unwrap().clips.len(), 5);
}

// ── Copy / paste ───────────────────────────────────────────────

#[test]
fn copy_paste_round_trip_keeps_original_intact() {
    let (mut session, _) = open(three_clip_timeline());
    session.select_clip("intro", false);
    session.select_clip("body", true);
    assert_eq!(session.copy_selected_clips(), 2);

    session.set_current_time(42.0);
    let pasted = session.paste_clips_at_current_time();
    assert_eq!(pasted.len(), 2);
    assert!(pasted.iter().all(|id| id.contains("-paste-")));
    assert_eq!(position(&session, &pasted[0]), 42.0);
    assert_eq!(position(&session, &pasted[1]), 52.0);
    assert_eq!(position(&session, "intro"), 0.0);

    // Pasting twice yields fresh ids.
    let again = session.paste_clips_at_current_time();
    assert!(again.iter().all(|id| !pasted.contains(id)));
    assert_eq!(session.timeline().unwrap().clips.len(), 7);
}

#[test]
fn clipboard_survives_undo() {
    let (mut session, _) = open(three_clip_timeline());
    session.select_clip("music", false);
    session.copy_selected_clips();
    session.remove_clip("music");
    session.undo();
    assert!(session.clipboard().has_clips());
    assert_eq!(session.paste_clips_at_current_time().len(), 1);
}

// ── History ────────────────────────────────────────────────────

#[test]
fn history_is_bounded_and_redo_dropped_after_edit() {
    let (mut session, _) = open(Timeline::new("bounded"));
    for i in 0..80 {
        session.add_marker(Marker::new(format!("m{i}"), i as f64, ""));
        assert!(session.history().len() <= 50);
    }
    assert_eq!(session.history().len(), 50);

    session.undo();
    session.undo();
    assert!(session.can_redo());
    session.add_clip(clip("late", 0.0, 0));
    assert!(!session.can_redo());
}

#[test]
fn configured_history_limit_applies() {
    let clock = ManualClock::new();
    let mut session = EditorSession::builder()
        .config(EditorConfig {
            history_limit: 3,
            ..EditorConfig::default()
        })
        .clock(clock)
        .build();
    session.initialize_editor(Some(Timeline::new("small")));
    for i in 0..10 {
        session.add_marker(Marker::new(format!("m{i}"), 0.0, ""));
    }
    assert_eq!(session.history().len(), 3);
}

#[test]
fn drag_burst_is_one_undo_step() {
    let (mut session, clock) = open(three_clip_timeline());
    let len = session.history().len();

    session.begin_drag("music");
    for step in 0..60 {
        session.drag_to(1, 20.0 + step as f64 * 0.25);
        clock.advance(Duration::from_millis(16));
        session.tick();
        session.snap_info();
    }
    session.end_drag();
    assert_eq!(session.history().len(), len + 1);

    session.undo();
    assert_eq!(position(&session, "music"), 0.0);
}

#[test]
fn undo_mid_drag_burst_commits_burst_first() {
    let (mut session, _) = open(three_clip_timeline());
    session.update_clip("intro", &ClipPatch::position(3.0));
    session.update_clip("intro", &ClipPatch::position(4.0));
    assert!(session.can_undo());

    assert!(session.undo());
    assert_eq!(position(&session, "intro"), 0.0);
    assert!(session.redo());
    assert_eq!(position(&session, "intro"), 4.0);
}

#[test]
fn drag_back_to_origin_leaves_nothing_to_undo() {
    let (mut session, clock) = open(three_clip_timeline());
    session.begin_drag("music");
    session.drag_to(1, 12.0);
    assert!(session.can_undo());
    session.drag_to(1, 0.0);
    assert!(!session.can_undo());
    clock.advance(Duration::from_secs(1));
    assert_eq!(session.tick(), 0);
    session.end_drag();
    assert!(!session.undo());
}

#[test]
fn revision_tracks_visible_changes() {
    let (mut session, _) = open(three_clip_timeline());
    let start = session.revision();
    session.select_clip("intro", false);
    session.select_clip("intro", false);
    assert_eq!(session.revision(), start + 1);
    assert!(!session.update_clip("intro", &ClipPatch::position(0.0)));
    assert!(!session.undo());
    assert_eq!(session.revision(), start + 1);
    session.update_clip("intro", &ClipPatch::position(2.0));
    assert_eq!(session.revision(), start + 2);
}

#[test]
fn undo_prunes_selection_of_vanished_clips() {
    let (mut session, _) = open(three_clip_timeline());
    session.add_clip(clip("extra", 40.0, 2));
    session.select_clip("extra", false);
    session.select_clip("intro", true);

    session.undo();
    assert!(!session.selection().is_selected("extra"));
    assert!(session.selection().is_selected("intro"));
}

// ── Drag snapping ──────────────────────────────────────────────

#[test]
fn drag_snaps_to_neighbour_and_reports_pointer() {
    let bus = PointerBus::new();
    let mut session = EditorSession::builder()
        .ids(SequentialIds::default())
        .clock(ManualClock::new())
        .pointer_bus(bus.clone())
        .build();
    session.initialize_editor(Some(three_clip_timeline()));
    session.set_drop_surface(Some(Rect::new(200.0, 400.0, 1000.0, 300.0)));

    assert!(session.begin_drag("body"));
    session.drag_to(0, 10.08);
    bus.publish(260.0, 450.0);

    let info = session.snap_info().unwrap();
    assert!(info.is_snapping && info.just_snapped);
    assert_eq!(info.snap_position, Some(10.0));
    assert_eq!(info.pointer.x, 60.0);
    assert_eq!(info.pointer.y, 50.0);
    // Candidates: origin plus intro's start and end, never body or music.
    assert_eq!(info.candidates, [0.0, 10.0]);

    assert!(!session.snap_info().unwrap().just_snapped);
    session.end_drag();
    assert_eq!(position(&session, "body"), 10.0);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn moving_to_another_track_changes_candidates() {
    let (mut session, _) = open(three_clip_timeline());
    session.begin_drag("body");
    session.drag_to(1, 10.05);
    let info = session.snap_info().unwrap();
    assert_eq!(info.candidates, [0.0, 10.0]);
    assert!(info.is_snapping);
    session.cancel_drag();
    let body = session.timeline().unwrap().clip("body").unwrap();
    assert_eq!((body.track_index, body.timeline_position), (0, 10.0));
}

// ── Other edits ────────────────────────────────────────────────

#[test]
fn transitions_apply_only_to_selection() {
    let (mut session, _) = open(three_clip_timeline());
    session.select_clip("intro", false);
    session.select_clip("body", true);
    assert!(session.add_transition_to_selected_clips(TransitionKind::Fade, 0.75));

    let timeline = session.timeline().unwrap();
    let with_transition: Vec<&str> = timeline
        .clips
        .iter()
        .filter(|c| c.transition_to_next.is_some())
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(with_transition, ["intro", "body"]);
}

#[test]
fn reorder_and_track_metadata() {
    let (mut session, _) = open(three_clip_timeline());
    assert!(session.reorder_clips(&["music", "intro"]));
    let order: Vec<&str> = session
        .timeline()
        .unwrap()
        .clips
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(order, ["music", "intro", "body"]);
    assert!(!session.reorder_clips(&["music", "intro", "body"]));

    assert!(session.update_track(
        1,
        &TrackPatch {
            muted: Some(true),
            ..Default::default()
        }
    ));
    assert!(session.timeline().unwrap().track(1).unwrap().muted);
}

#[test]
fn reinitialize_discards_session_state() {
    let (mut session, _) = open(three_clip_timeline());
    session.update_clip("intro", &ClipPatch::position(7.0));
    session.select_all();
    session.copy_selected_clips();

    session.initialize_editor(None);
    assert!(session.timeline().is_none());
    assert!(!session.history().has_pending());
    assert!(session.selection().is_empty());
    assert!(!session.clipboard().has_clips());
    assert!(!session.add_clip(clip("x", 0.0, 0)));
}
