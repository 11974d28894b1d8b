//! Montage Timeline - Timeline document model
//!
//! Implements the composition structure for the editor:
//! - Clips placed on sparse, index-keyed tracks
//! - Markers and text overlays
//! - Output settings
//! - Invariant-preserving mutation primitives (`TimelineDocument`)
//! - JSON interchange with the persistence collaborator

pub mod clip;
pub mod document;
pub mod marker;
pub mod output;
pub mod overlay;
pub mod serialization;
pub mod timeline;
pub mod track;

mod keyed;

pub use clip::{Clip, ClipPatch, Crop, Transition, TransitionKind};
pub use document::TimelineDocument;
pub use marker::{Marker, MarkerPatch};
pub use output::{ContainerFormat, OutputPatch, OutputSettings};
pub use overlay::{OverlayPosition, TextAlign, TextOverlay, TextOverlayPatch, TextStyle};
pub use serialization::{timeline_from_json, timeline_to_json};
pub use timeline::Timeline;
pub use track::{Track, TrackKind, TrackPatch};
