//! Run - a named, immutable group of readings saved for comparison

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reading;
use crate::quantity::Fields;

/// A saved group of readings.
///
/// Labels are not required to be unique. Code that uses the label as a
/// key must be prepared for duplicates; [`RunSelector::Index`] is the
/// unambiguous handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    label: String,
    readings: Vec<Reading>,
    saved_at: DateTime<Utc>,
    #[serde(default = "visible_by_default")]
    visible: bool,
    #[serde(default)]
    controls: Fields,
}

const fn visible_by_default() -> bool {
    true
}

impl Run {
    /// Create a visible run stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `label` - Display label
    /// * `readings` - Readings to snapshot (taken by value)
    #[must_use]
    pub fn new(label: impl Into<String>, readings: Vec<Reading>) -> Self {
        Self {
            label: label.into(),
            readings,
            saved_at: Utc::now(),
            visible: true,
            controls: Fields::new(),
        }
    }

    /// Attach the control values in effect when the run was saved.
    #[must_use]
    pub fn with_controls(mut self, controls: Fields) -> Self {
        self.controls = controls;
        self
    }

    /// Set a custom save timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn saved_at_time(mut self, saved_at: DateTime<Utc>) -> Self {
        self.saved_at = saved_at;
        self
    }

    /// Get the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the readings in recording order.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Get the save timestamp.
    #[must_use]
    pub const fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }

    /// Whether the run is shown on graphs.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Control values at save time.
    #[must_use]
    pub const fn controls(&self) -> &Fields {
        &self.controls
    }

    /// Number of readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the run holds no readings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    // Visibility is presentation state; readings stay untouched.
    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Handle for a saved run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelector {
    /// First run carrying this label.
    Label(String),
    /// Position in the saved-run list.
    Index(usize),
}

impl From<usize> for RunSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for RunSelector {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}
