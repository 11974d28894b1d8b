//! Clip clipboard with relative-position paste.

use std::collections::HashSet;

use montage_core::{IdSource, MAX_ID_DRAWS};
use montage_timeline::Clip;
use tracing::{debug, warn};

/// Holds value copies of clips, isolated from the live document.
#[derive(Debug, Default, Clone)]
pub struct ClipboardManager {
    copied: Vec<Clip>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard with copies of `clips`. Copying nothing clears it.
    pub fn copy_clips<'a>(&mut self, clips: impl IntoIterator<Item = &'a Clip>) -> usize {
        self.copied = clips.into_iter().cloned().collect();
        debug!(clips = self.copied.len(), "Copied to clipboard");
        self.copied.len()
    }

    pub fn has_clips(&self) -> bool {
        !self.copied.is_empty()
    }

    pub fn len(&self) -> usize {
        self.copied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }

    /// The copied clips, in copy order.
    pub fn clips(&self) -> &[Clip] {
        &self.copied
    }

    /// Produce fresh clips placed so the earliest copied clip lands on `target_time`.
    ///
    /// Spacing between clips is preserved exactly. Each pasted id is
    /// `<original>-paste-<fresh>` and is never one `is_taken` reports or one
    /// already handed out by this call. A clip that cannot get an unused id
    /// within [`MAX_ID_DRAWS`] draws is skipped. The clipboard itself is left
    /// untouched.
    pub fn paste_clips(
        &self,
        target_time: f64,
        ids: &mut dyn IdSource,
        is_taken: impl Fn(&str) -> bool,
    ) -> Vec<Clip> {
        let Some(min_position) = self
            .copied
            .iter()
            .map(|clip| clip.timeline_position)
            .reduce(f64::min)
        else {
            return Vec::new();
        };
        let target_time = if target_time.is_finite() {
            target_time.max(0.0)
        } else {
            0.0
        };

        let mut issued: HashSet<String> = HashSet::new();
        let mut pasted = Vec::with_capacity(self.copied.len());
        for clip in &self.copied {
            let fresh = ids.next_unused_id(&|fresh: &str| {
                let candidate = format!("{}-paste-{fresh}", clip.id);
                issued.contains(&candidate) || is_taken(&candidate)
            });
            let Some(fresh) = fresh else {
                warn!(clip = %clip.id, "No unused id for pasted clip");
                continue;
            };
            let mut copy = clip.clone();
            copy.id = format!("{}-paste-{fresh}", clip.id);
            copy.timeline_position = target_time + (clip.timeline_position - min_position);
            issued.insert(copy.id.clone());
            pasted.push(copy);
        }
        pasted
    }

    pub fn clear_clipboard(&mut self) {
        self.copied.clear();
    }
}
