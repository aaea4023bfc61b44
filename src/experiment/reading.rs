//! Reading - one captured snapshot of inputs and derived outputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quantity::{Fields, Quantity};

/// A single recorded measurement.
///
/// Immutable once created: there are no setters, and every consumer
/// (table, graph, export) works on borrowed or cloned readings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    inputs: Fields,
    outputs: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recorded_at: Option<DateTime<Utc>>,
}

impl Reading {
    /// Create an unstamped reading.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Control values at capture time
    /// * `outputs` - Derived quantities at capture time
    #[must_use]
    pub const fn new(inputs: Fields, outputs: Fields) -> Self {
        Self {
            inputs,
            outputs,
            recorded_at: None,
        }
    }

    /// Attach a display timestamp.
    #[must_use]
    pub const fn recorded_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.recorded_at = Some(timestamp);
        self
    }

    /// Get the input values.
    #[must_use]
    pub const fn inputs(&self) -> &Fields {
        &self.inputs
    }

    /// Get the derived outputs.
    #[must_use]
    pub const fn outputs(&self) -> &Fields {
        &self.outputs
    }

    /// Get the capture timestamp, if one was attached.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }

    /// Look a key up in inputs first, then outputs.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Quantity> {
        self.inputs.get(key).or_else(|| self.outputs.get(key))
    }

    /// Input keys followed by output keys not already listed.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.inputs.keys().collect();
        for key in self.outputs.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Inputs and outputs merged into one row (outputs win on clashes).
    #[must_use]
    pub fn flatten(&self) -> Fields {
        let mut row = self.inputs.clone();
        for (key, value) in self.outputs.iter() {
            row.insert(key, value.clone());
        }
        row
    }
}
