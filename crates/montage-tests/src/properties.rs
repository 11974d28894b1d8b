//! Randomized editing sessions checked against document and history invariants.

use std::time::Duration;

use montage_core::limits::{HISTORY_LIMIT, MIN_CLIP_DURATION};
use montage_core::{ManualClock, SequentialIds};
use montage_editor::EditorSession;
use montage_timeline::{Clip, ClipPatch, Timeline, Track, TransitionKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Add { slot: u8, position: f64, source: f64 },
    Move { slot: u8, track: u32, position: f64 },
    Trim { slot: u8, start: f64, end: f64 },
    Split { slot: u8, time: f64 },
    Remove { slot: u8 },
    Select { slot: u8, multi: bool },
    CopyPaste { at: f64 },
    Transition,
    Undo,
    Redo,
    Wait { ms: u64 },
}

fn any_time() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -20.0f64..200.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..6, 0.0f64..100.0, 1.0f64..30.0)
            .prop_map(|(slot, position, source)| Action::Add { slot, position, source }),
        (0u8..6, 0u32..3, any_time())
            .prop_map(|(slot, track, position)| Action::Move { slot, track, position }),
        (0u8..6, any_time(), any_time())
            .prop_map(|(slot, start, end)| Action::Trim { slot, start, end }),
        (0u8..6, any_time()).prop_map(|(slot, time)| Action::Split { slot, time }),
        (0u8..6).prop_map(|slot| Action::Remove { slot }),
        (0u8..6, any::<bool>()).prop_map(|(slot, multi)| Action::Select { slot, multi }),
        any_time().prop_map(|at| Action::CopyPaste { at }),
        Just(Action::Transition),
        any::<bool>().prop_map(|redo| if redo { Action::Redo } else { Action::Undo }),
        (0u64..600).prop_map(|ms| Action::Wait { ms }),
    ]
}

/// Resolve a slot to an existing clip id, if the document has any clips.
fn pick(session: &EditorSession, slot: u8) -> Option<String> {
    let clips = &session.timeline()?.clips;
    if clips.is_empty() {
        return None;
    }
    Some(clips[slot as usize % clips.len()].id.clone())
}

fn apply(session: &mut EditorSession, clock: &ManualClock, action: &Action) {
    match *action {
        Action::Add { slot, position, source } => {
            session.add_clip(
                Clip::new(format!("c{slot}"), "asset", 0.0, source)
                    .with_source_duration(source)
                    .at(position),
            );
        }
        Action::Move { slot, track, position } => {
            if let Some(id) = pick(session, slot) {
                session.update_clip(&id, &ClipPatch::placement(track, position));
            }
        }
        Action::Trim { slot, start, end } => {
            if let Some(id) = pick(session, slot) {
                session.update_clip(&id, &ClipPatch::trim(start, end));
            }
        }
        Action::Split { slot, time } => {
            if let Some(id) = pick(session, slot) {
                session.split_clip_at_time(&id, time);
            }
        }
        Action::Remove { slot } => {
            if let Some(id) = pick(session, slot) {
                session.remove_clip(&id);
            }
        }
        Action::Select { slot, multi } => {
            if let Some(id) = pick(session, slot) {
                session.select_clip(&id, multi);
            }
        }
        Action::CopyPaste { at } => {
            session.copy_selected_clips();
            session.set_current_time(at);
            session.paste_clips_at_current_time();
        }
        Action::Transition => {
            session.add_transition_to_selected_clips(TransitionKind::Wipe, 0.5);
        }
        Action::Undo => {
            session.undo();
        }
        Action::Redo => {
            session.redo();
        }
        Action::Wait { ms } => {
            clock.advance(Duration::from_millis(ms));
            session.tick();
        }
    }
}

fn assert_clip_invariants(timeline: &Timeline) {
    for clip in &timeline.clips {
        assert!(clip.start >= 0.0, "{clip:?}");
        assert!(clip.end - clip.start >= MIN_CLIP_DURATION, "{clip:?}");
        assert!(clip.timeline_position >= 0.0, "{clip:?}");
        if let Some(source) = clip.source_duration {
            assert!(clip.start <= source, "{clip:?}");
            assert!(clip.end <= source, "{clip:?}");
        }
        let copies = timeline.clips.iter().filter(|c| c.id == clip.id).count();
        assert_eq!(copies, 1, "duplicate id {}", clip.id);
    }
}

proptest! {
    #[test]
    fn random_sessions_preserve_invariants(
        actions in prop::collection::vec(action(), 1..120),
    ) {
        let clock = ManualClock::new();
        let mut session = EditorSession::builder()
            .ids(SequentialIds::new("g"))
            .clock(clock.clone())
            .build();
        let mut timeline = Timeline::new("prop");
        timeline.tracks.push(Track::new(0));
        session.initialize_editor(Some(timeline));

        for action in &actions {
            apply(&mut session, &clock, action);
            let timeline = session.timeline().unwrap();
            assert_clip_invariants(timeline);
            prop_assert!(session.history().len() <= HISTORY_LIMIT);
            prop_assert!(session.history().index() < session.history().len());
        }
    }

    #[test]
    fn undo_all_then_redo_all_is_identity(
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let clock = ManualClock::new();
        let mut session = EditorSession::builder()
            .ids(SequentialIds::new("g"))
            .clock(clock.clone())
            .build();
        session.initialize_editor(Some(Timeline::new("prop")));

        for action in actions.iter().filter(|a| !matches!(a, Action::Undo | Action::Redo)) {
            apply(&mut session, &clock, action);
        }
        session.shutdown();
        let edited = session.timeline().cloned();

        while session.undo() {}
        while session.redo() {}
        prop_assert_eq!(session.timeline().cloned(), edited);
    }
}
