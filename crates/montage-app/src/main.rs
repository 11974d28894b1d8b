//! Montage - timeline editing engine
//!
//! Loads a timeline document, opens an editing session over it and reports
//! what the session sees.

use anyhow::{Context, Result};
use montage_editor::{EditorConfig, EditorSession};
use montage_timeline::timeline_from_json;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let Some(timeline_path) = args.next().map(PathBuf::from) else {
        anyhow::bail!("usage: montage <timeline.json> [editor-config.json]");
    };
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {path}"))?;
            EditorConfig::from_json(&json)?
        }
        None => EditorConfig::default(),
    };

    let data = std::fs::read(&timeline_path)
        .with_context(|| format!("Failed to read {}", timeline_path.display()))?;
    let timeline = timeline_from_json(&data)?;

    let mut session = EditorSession::builder().config(config).build();
    session.initialize_editor(Some(timeline));

    if let Some(timeline) = session.timeline() {
        info!(
            project = %timeline.project_id,
            clips = timeline.clips.len(),
            tracks = timeline.max_track_index().map_or(0, |i| i + 1),
            markers = timeline.markers.len(),
            overlays = timeline.text_overlays.len(),
            duration = timeline.duration(),
            "Timeline loaded"
        );
        if timeline.clips.is_empty() {
            warn!("Timeline has no clips");
        }
        for clip in &timeline.clips {
            info!(
                clip = %clip.id,
                track = clip.track_index,
                position = clip.timeline_position,
                duration = clip.duration(),
                "Clip"
            );
        }
    }

    session.shutdown();
    Ok(())
}
