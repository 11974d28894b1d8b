//! Load, edit and save timelines through the JSON adapter.

use montage_core::limits::MIN_CLIP_DURATION;
use montage_core::{ManualClock, MontageError, SequentialIds};
use montage_editor::{EditorConfig, EditorSession};
use montage_timeline::{timeline_from_json, timeline_to_json, ClipPatch, OutputPatch};

const PROJECT: &str = r##"{
    "projectId": "wedding-cut",
    "clips": [
        {"id": "ceremony", "assetId": "cam-a", "start": 2, "end": 32, "sourceDuration": 40,
         "timelinePosition": 0, "trackIndex": 0},
        {"id": "vows", "assetId": "cam-b", "start": 0, "end": 12, "sourceDuration": 12,
         "timelinePosition": 30, "trackIndex": 0, "volume": 0.8},
        {"id": "score", "assetId": "music", "start": 0, "end": 60,
         "timelinePosition": 0, "trackIndex": 1, "hasAudio": true}
    ],
    "markers": [{"id": "kiss", "time": 38, "label": "Kiss", "color": "#ff3366"}],
    "textOverlays": [
        {"id": "title", "text": "Anna & Ben", "startTime": 0, "endTime": 4,
         "position": {"x": 0.5, "y": 0.8},
         "style": {"fontFamily": "Inter", "fontSize": 64, "color": "#ffffff",
                   "bold": true, "italic": false, "align": "center"}}
    ],
    "tracks": [{"index": 1, "name": "Score", "kind": "audio", "volume": 0.6}],
    "output": {"width": 3840, "height": 2160, "fps": 25, "format": "mov"}
}"##;

fn open(json: &str) -> EditorSession {
    let timeline = timeline_from_json(json.as_bytes()).unwrap();
    let mut session = EditorSession::builder()
        .ids(SequentialIds::new("n"))
        .clock(ManualClock::new())
        .build();
    session.initialize_editor(Some(timeline));
    session
}

#[test]
fn loads_collaborator_document() {
    let session = open(PROJECT);
    let timeline = session.timeline().unwrap();
    assert_eq!(timeline.project_id, "wedding-cut");
    assert_eq!(timeline.clips.len(), 3);
    assert_eq!(timeline.duration(), 60.0);
    assert_eq!(timeline.track(1).unwrap().label(), "Score");
    assert_eq!(timeline.output.format.extension(), "mov");
    assert_eq!(timeline.text_overlays[0].style.font_size, 64.0);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn edits_survive_save_and_reload() {
    let mut session = open(PROJECT);
    let right = session.split_clip_at_time("ceremony", 10.0).unwrap();
    session.update_clip("vows", &ClipPatch::trim(1.0, 11.0));
    session.update_output(&OutputPatch {
        fps: Some(50.0),
        ..Default::default()
    });
    session.shutdown();

    let saved = timeline_to_json(session.timeline().unwrap()).unwrap();
    let reloaded = timeline_from_json(&saved).unwrap();
    assert_eq!(&reloaded, session.timeline().unwrap());

    let split = reloaded.clip(&right).unwrap();
    assert_eq!(split.start, 12.0);
    assert_eq!(split.timeline_position, 10.0);
    assert_eq!(reloaded.clip("vows").unwrap().duration(), 10.0);
    assert_eq!(reloaded.output.fps, 50.0);
}

#[test]
fn loading_repairs_out_of_range_values() {
    let json = r#"{
        "projectId": "broken",
        "clips": [
            {"id": "a", "assetId": "x", "start": 8, "end": 3, "sourceDuration": 5,
             "timelinePosition": -2, "volume": 4, "opacity": -1, "speed": 0}
        ],
        "markers": [{"id": "m", "time": -10, "label": ""}],
        "output": {"width": 0, "height": 0, "fps": -5}
    }"#;
    let session = open(json);
    let timeline = session.timeline().unwrap();
    let clip = &timeline.clips[0];
    assert!(clip.start >= 0.0 && clip.end <= 5.0);
    assert!(clip.end - clip.start >= MIN_CLIP_DURATION);
    assert_eq!(clip.timeline_position, 0.0);
    assert_eq!((clip.volume, clip.opacity, clip.speed), (1.0, 0.0, 1.0));
    assert_eq!(timeline.markers[0].time, 0.0);
    assert_eq!((timeline.output.width, timeline.output.height), (1, 1));
    assert_eq!(timeline.output.fps, 1.0);
}

#[test]
fn rejects_unusable_documents() {
    assert!(matches!(
        timeline_from_json(br#"{"projectId": "p", "clips": 3}"#),
        Err(MontageError::Serialization(_))
    ));
    assert!(matches!(
        timeline_from_json(b"{}"),
        Err(MontageError::Serialization(_))
    ));
    assert!(matches!(
        timeline_from_json(br#"{"projectId": ""}"#),
        Err(MontageError::InvalidParameter(_))
    ));
}

#[test]
fn config_from_json_is_sanitized() {
    let config = EditorConfig::from_json(
        r#"{"historyLimit": 0, "snapThreshold": -1, "zoomMin": 300, "zoomMax": 20}"#,
    )
    .unwrap();
    assert_eq!(config.history_limit, 1);
    assert_eq!(config.snap_threshold, 0.0);
    assert!(config.zoom_min <= config.zoom_max);
    assert_eq!(config.coalesce_window_ms, 300);
}
