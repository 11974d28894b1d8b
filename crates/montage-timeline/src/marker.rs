//! Timeline markers.

use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;

/// A labelled point in time on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    /// Seconds on the timeline
    pub time: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Marker {
    pub fn new(id: impl Into<String>, time: f64, label: impl Into<String>) -> Self {
        let mut marker = Self {
            id: id.into(),
            time,
            label: label.into(),
            color: None,
        };
        marker.normalize();
        marker
    }

    /// Keep the marker on the visible (non-negative) part of the timeline.
    pub fn normalize(&mut self) {
        self.time = if self.time.is_finite() {
            self.time.max(0.0)
        } else {
            0.0
        };
    }
}

impl Keyed for Marker {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A partial update to a marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPatch {
    pub time: Option<f64>,
    pub label: Option<String>,
    pub color: Option<Option<String>>,
}

impl MarkerPatch {
    pub fn apply(&self, marker: &mut Marker) {
        if let Some(time) = self.time {
            marker.time = time;
        }
        if let Some(label) = &self.label {
            marker.label.clone_from(label);
        }
        if let Some(color) = &self.color {
            marker.color.clone_from(color);
        }
        marker.normalize();
    }
}
