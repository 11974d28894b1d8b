//! Montage Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types shared by the editor crates:
//! - Error type and result alias
//! - Editing limits (minimum clip duration, history depth, snap threshold)
//! - 2D geometry used for pointer tracking
//! - Id generation and clock collaborators

pub mod clock;
pub mod error;
pub mod geometry;
pub mod ids;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{MontageError, Result};
pub use geometry::{Point, Rect};
pub use ids::{IdSource, SequentialIds, UuidIds, MAX_ID_DRAWS};

/// Editing limits shared across the document model and the editor.
pub mod limits {
    /// Shortest trim span a clip may have, in seconds.
    pub const MIN_CLIP_DURATION: f64 = 0.1;

    /// Maximum number of history snapshots kept.
    pub const HISTORY_LIMIT: usize = 50;

    /// Distance (seconds) within which a dragged clip locks onto a candidate.
    pub const SNAP_THRESHOLD: f64 = 0.1;

    /// Quiet period (milliseconds) before a coalesced edit is committed.
    pub const COALESCE_WINDOW_MS: u64 = 300;

    /// Timeline zoom bounds (pixels per second).
    pub const ZOOM_MIN: f64 = 10.0;
    pub const ZOOM_MAX: f64 = 200.0;
    pub const ZOOM_DEFAULT: f64 = 50.0;
}
