//! Clip selection.

use std::collections::HashSet;

use montage_timeline::Timeline;

/// The set of selected clip ids. Membership only, no order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionManager {
    selected: HashSet<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clip. Without `multi` the selection becomes exactly `{id}`;
    /// with `multi` the id is toggled. Returns whether the selection changed.
    pub fn select_clip(&mut self, id: &str, multi: bool) -> bool {
        if multi {
            if !self.selected.remove(id) {
                self.selected.insert(id.to_string());
            }
            return true;
        }
        if self.selected.len() == 1 && self.selected.contains(id) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(id.to_string());
        true
    }

    /// Replace the selection with exactly `ids`. Returns whether it changed.
    pub fn replace<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: HashSet<String> = ids.into_iter().map(Into::into).collect();
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Drop ids that no longer name a clip in `timeline`.
    pub fn retain_existing(&mut self, timeline: &Timeline) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| timeline.contains_clip(id));
        before - self.selected.len()
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
