//! Identifier generation.
//!
//! New clips created by splitting or pasting need fresh ids. Only uniqueness
//! and a stable format are required, so the generator is a collaborator the
//! editor is handed rather than something it owns.

use uuid::Uuid;

/// How many ids [`IdSource::next_unused_id`] draws before giving up.
pub const MAX_ID_DRAWS: usize = 64;

/// Source of unique string identifiers.
pub trait IdSource {
    /// Produce an identifier never returned before by this source.
    fn next_id(&mut self) -> String;

    /// Draw ids until one is not `is_taken`. A source restarted over an
    /// existing document can repeat ids, so callers that insert into a
    /// document check against it. Returns `None` after [`MAX_ID_DRAWS`] misses.
    fn next_unused_id(&mut self, is_taken: &dyn Fn(&str) -> bool) -> Option<String> {
        (0..MAX_ID_DRAWS)
            .map(|_| self.next_id())
            .find(|id| !is_taken(id))
    }
}

/// Random v4 UUIDs, the default in a live session.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix><n>` ids, handy for tests and replays.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
