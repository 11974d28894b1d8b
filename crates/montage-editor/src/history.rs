//! Snapshot history with undo/redo and coalesced commits.
//!
//! Every committed state is an immutable [`Snapshot`] of the whole timeline.
//! `index` points at the snapshot matching the live document; committing
//! after an undo discards the redo tail.
//!
//! High-frequency edits (live drags) go through [`PendingCommits`]: each
//! coalescing key holds at most one pending snapshot, rescheduled on every
//! edit, and committed once its quiet period elapses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use montage_core::limits::{COALESCE_WINDOW_MS, HISTORY_LIMIT};
use montage_timeline::Timeline;
use tracing::{debug, trace};

/// An immutable copy of the timeline at one point in history.
pub type Snapshot = Arc<Timeline>;

// ── Pending commits ─────────────────────────────────────────────

#[derive(Debug, Clone)]
struct PendingCommit {
    key: String,
    snapshot: Snapshot,
    due: Instant,
}

/// Pending coalesced commits, at most one per key, kept in scheduling order.
#[derive(Debug, Default, Clone)]
pub struct PendingCommits {
    entries: Vec<PendingCommit>,
}

impl PendingCommits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `snapshot` under `key`, cancelling any pending entry for the same key.
    pub fn schedule(&mut self, key: impl Into<String>, snapshot: Snapshot, due: Instant) {
        let key = key.into();
        self.entries.retain(|entry| entry.key != key);
        trace!(key = %key, "Commit scheduled");
        self.entries.push(PendingCommit { key, snapshot, due });
    }

    /// Remove and return every entry due at or before `now`, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Snapshot> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = waiting;
        due.into_iter().map(|entry| entry.snapshot).collect()
    }

    /// Remove and return every entry regardless of its deadline, oldest first.
    pub fn take_all(&mut self) -> Vec<Snapshot> {
        self.entries.drain(..).map(|entry| entry.snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline, if anything is pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Whether any pending snapshot differs from `timeline`.
    pub fn differs_from(&self, timeline: &Timeline) -> bool {
        self.entries.iter().any(|entry| *entry.snapshot != *timeline)
    }
}

// ── History manager ─────────────────────────────────────────────

/// Undo/redo history over timeline snapshots.
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<Snapshot>,
    index: usize,
    limit: usize,
    window: Duration,
    pending: PendingCommits,
}

impl HistoryManager {
    /// Create an empty history keeping at most `limit` snapshots.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.max(1),
            window,
            pending: PendingCommits::new(),
        }
    }

    /// Reset to a single snapshot of `timeline` (or nothing), dropping pending commits.
    pub fn initialize(&mut self, timeline: Option<&Timeline>) {
        self.pending = PendingCommits::new();
        self.entries = timeline
            .map(|timeline| vec![Arc::new(timeline.clone())])
            .unwrap_or_default();
        self.index = 0;
    }

    /// Commit `timeline` immediately.
    ///
    /// Anything still pending is committed first so history follows mutation order.
    pub fn commit(&mut self, timeline: &Timeline) -> bool {
        self.flush_all();
        self.push(Arc::new(timeline.clone()))
    }

    /// Schedule a coalesced commit of `timeline` under `key`.
    ///
    /// A later call with the same key before the window elapses replaces this one.
    pub fn commit_coalesced(&mut self, timeline: &Timeline, key: &str, now: Instant) {
        self.pending
            .schedule(key, Arc::new(timeline.clone()), now + self.window);
    }

    /// Commit every pending entry whose quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> usize {
        if self.pending.next_due().map_or(true, |due| due > now) {
            return 0;
        }
        self.pending
            .take_due(now)
            .into_iter()
            .filter(|snapshot| self.push(Arc::clone(snapshot)))
            .count()
    }

    /// Commit every pending entry now.
    pub fn flush_all(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        self.pending
            .take_all()
            .into_iter()
            .filter(|snapshot| self.push(Arc::clone(snapshot)))
            .count()
    }

    /// Drop every pending entry without committing it.
    pub fn cancel_all(&mut self) -> usize {
        self.pending.take_all().len()
    }

    /// Step back one snapshot. Pending edits are committed first.
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.flush_all();
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        debug!(index = self.index, "Undo");
        self.entries.get(self.index).cloned()
    }

    /// Step forward one snapshot. Pending edits are committed first, which
    /// invalidates the redo tail like any other edit.
    pub fn redo(&mut self) -> Option<Snapshot> {
        self.flush_all();
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        debug!(index = self.index, "Redo");
        self.entries.get(self.index).cloned()
    }

    /// Check if undo is available, counting pending edits that would commit.
    pub fn can_undo(&self) -> bool {
        self.index > 0 || self.pending_would_commit()
    }

    /// Check if redo is available. A pending edit that would commit discards
    /// the redo tail, so it rules redo out.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len() && !self.pending_would_commit()
    }

    /// Whether flushing now would push at least one snapshot.
    fn pending_would_commit(&self) -> bool {
        self.entries
            .get(self.index)
            .is_some_and(|current| self.pending.differs_from(current))
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the snapshot matching the live document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &PendingCommits {
        &self.pending
    }

    /// Append a snapshot after `index`, discarding the redo tail and evicting
    /// the oldest entries beyond the limit. Snapshots equal to the current one
    /// are skipped.
    fn push(&mut self, snapshot: Snapshot) -> bool {
        if let Some(current) = self.entries.get(self.index) {
            if **current == *snapshot {
                return false;
            }
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(snapshot);
        while self.entries.len() > self.limit {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
        debug!(entries = self.entries.len(), index = self.index, "History commit");
        true
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT, Duration::from_millis(COALESCE_WINDOW_MS))
    }
}

// ── Tests ───────────────────────────────────────────────────────
