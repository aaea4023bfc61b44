//! Reading log - the current run plus the saved-run collection
//!
//! The log is append-only: readings are never reordered or edited in
//! place. Sorting and filtering for display always build new sequences
//! (see [`crate::table`]), so the graph, export and statistics consumers
//! all see the same canonical order.

use chrono::Utc;
use tracing::{debug, warn};

use super::{Reading, Run, RunSelector};
use crate::quantity::Fields;

/// Current (unsaved) readings and the saved runs of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingLog {
    current: Vec<Reading>,
    runs: Vec<Run>,
}

impl ReadingLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Readings of the current run, in recording order.
    #[must_use]
    pub fn current(&self) -> &[Reading] {
        &self.current
    }

    /// Saved runs, in save order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Saved runs currently shown on graphs.
    pub fn visible_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| r.is_visible())
    }

    /// Look up a saved run.
    #[must_use]
    pub fn run(&self, selector: &RunSelector) -> Option<&Run> {
        self.position(selector).map(|i| &self.runs[i])
    }

    /// Number of readings in the current run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether the current run is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of saved runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Whether there is anything to export (current or saved readings).
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.current.is_empty() || self.runs.iter().any(|r| !r.is_empty())
    }

    /// Append a reading to the current run.
    ///
    /// Returns the new reading's index, or `None` (with a warning) when
    /// `outputs` is empty. Undefined outputs are recorded as such and
    /// reported.
    pub fn record(&mut self, inputs: Fields, outputs: Fields) -> Option<usize> {
        if outputs.is_empty() {
            warn!("reading rejected: no derived outputs");
            return None;
        }
        if outputs.has_undefined() {
            let undefined: Vec<&str> = outputs
                .iter()
                .filter(|(_, v)| v.is_undefined())
                .map(|(k, _)| k)
                .collect();
            warn!(?undefined, "recording reading with undefined outputs");
        }
        self.current
            .push(Reading::new(inputs, outputs).recorded_at(Utc::now()));
        let index = self.current.len() - 1;
        debug!(index, "reading recorded");
        Some(index)
    }

    /// Empty the current run. Saved runs are unaffected.
    pub fn clear(&mut self) {
        debug!(discarded = self.current.len(), "current run cleared");
        self.current.clear();
    }

    /// Snapshot the current run as a named run, then clear it.
    ///
    /// A blank label becomes `Run {n}`. Labels may repeat. Saving an empty
    /// current run is a no-op that returns `None`.
    pub fn save_as_run(&mut self, label: &str) -> Option<&Run> {
        self.save_with_controls(label, Fields::new())
    }

    /// [`ReadingLog::save_as_run`], also recording the control values.
    pub fn save_with_controls(&mut self, label: &str, controls: Fields) -> Option<&Run> {
        if self.current.is_empty() {
            warn!("save ignored: current run has no readings");
            return None;
        }
        let label = match label.trim() {
            "" => format!("Run {}", self.runs.len() + 1),
            trimmed => trimmed.to_string(),
        };
        if self.runs.iter().any(|r| r.label() == label) {
            warn!(%label, "saved run label is not unique; select by index to disambiguate");
        }
        let readings = std::mem::take(&mut self.current);
        debug!(%label, readings = readings.len(), "run saved");
        self.runs.push(Run::new(label, readings).with_controls(controls));
        self.runs.last()
    }

    /// Remove a saved run. Unknown selectors are a reported no-op.
    pub fn delete_run(&mut self, selector: &RunSelector) -> Option<Run> {
        let Some(index) = self.position(selector) else {
            warn!(?selector, "delete ignored: no such run");
            return None;
        };
        let run = self.runs.remove(index);
        debug!(label = run.label(), "run deleted");
        Some(run)
    }

    /// Show or hide a saved run on graphs. Returns `false` if not found.
    pub fn set_visibility(&mut self, selector: &RunSelector, visible: bool) -> bool {
        match self.position(selector) {
            Some(index) => {
                self.runs[index].set_visible(visible);
                true
            }
            None => {
                warn!(?selector, "visibility change ignored: no such run");
                false
            }
        }
    }

    /// Flip a saved run's visibility. Returns the new state.
    pub fn toggle_visibility(&mut self, selector: &RunSelector) -> Option<bool> {
        let index = self.position(selector)?;
        let run = &mut self.runs[index];
        run.set_visible(!run.is_visible());
        Some(run.is_visible())
    }

    /// Append previously saved runs (e.g. restored from an archive).
    pub fn restore_runs(&mut self, runs: impl IntoIterator<Item = Run>) {
        self.runs.extend(runs);
    }

    /// Drop the current run and every saved run.
    pub fn reset(&mut self) {
        self.current.clear();
        self.runs.clear();
    }

    fn position(&self, selector: &RunSelector) -> Option<usize> {
        match selector {
            RunSelector::Index(i) => (*i < self.runs.len()).then_some(*i),
            RunSelector::Label(label) => self.runs.iter().position(|r| r.label() == label),
        }
    }
}
