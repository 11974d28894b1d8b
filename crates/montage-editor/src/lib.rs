//! Montage Editor - Interactive editing session
//!
//! Everything the UI calls goes through [`EditorSession`], which sequences
//! document mutation, history commits and selection/clipboard side effects
//! as one unit:
//! - Snapshot history with coalesced commits for live drags
//! - Multi-select and clipboard copy/paste
//! - Drag snapping with a one-shot "just snapped" pulse
//! - Pointer tracking through an explicit subscription bus

pub mod clipboard;
pub mod config;
pub mod history;
pub mod pointer;
pub mod selection;
pub mod session;
pub mod snapping;

pub use clipboard::ClipboardManager;
pub use config::EditorConfig;
pub use history::{HistoryManager, PendingCommits, Snapshot};
pub use pointer::{PointerBus, PointerMove, PointerSubscription};
pub use selection::SelectionManager;
pub use session::{EditorSession, SessionBuilder};
pub use snapping::{snap_candidates, DraggingClip, SnapEngine, SnapInfo};
