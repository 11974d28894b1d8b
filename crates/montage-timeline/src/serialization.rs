//! JSON interchange with the persistence collaborator.
//!
//! The collaborator stores timelines as camelCase JSON documents. Decoding
//! runs every item through the same invariants as interactive edits, so a
//! loaded document is always valid.

use montage_core::{MontageError, Result};
use tracing::{debug, warn};

use crate::keyed;
use crate::timeline::Timeline;

/// Decode a timeline, repairing anything that violates document invariants.
///
/// Clips sharing an id collapse into the first slot, keeping the last value,
/// exactly like repeated `add_clip` calls.
pub fn timeline_from_json(data: &[u8]) -> Result<Timeline> {
    let mut raw: Timeline = serde_json::from_slice(data)?;
    if raw.project_id.is_empty() {
        return Err(MontageError::InvalidParameter(
            "timeline is missing a projectId".to_string(),
        ));
    }

    let clips = std::mem::take(&mut raw.clips);
    let total = clips.len();
    for mut clip in clips {
        clip.normalize();
        keyed::upsert(&mut raw.clips, clip);
    }
    if raw.clips.len() != total {
        warn!(
            duplicates = total - raw.clips.len(),
            "Collapsed clips with duplicate ids"
        );
    }
    for marker in &mut raw.markers {
        marker.normalize();
    }
    for overlay in &mut raw.text_overlays {
        overlay.normalize();
    }
    raw.output.normalize();

    debug!(
        project = %raw.project_id,
        clips = raw.clips.len(),
        "Timeline decoded"
    );
    Ok(raw)
}

/// Encode a timeline as pretty-printed JSON.
pub fn timeline_to_json(timeline: &Timeline) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(timeline).map_err(|e| {
        MontageError::Serialization(format!("Failed to serialize timeline: {}", e))
    })
}
