//! Experiment session - the single owner of one apparatus-in-use
//!
//! A session bundles the control panel, the reading log and the views over
//! it. Every consumer receives the session (or a borrow of its log) by
//! reference; there is no ambient log state. Switching apparatus means
//! building a new session.

use tracing::debug;

use super::{Reading, ReadingLog, Run, RunSelector};
use crate::apparatus::{Apparatus, Evaluation};
use crate::config::LabConfig;
use crate::controls::ControlPanel;
use crate::export::{self, Download, ExperimentMeta, ExportFormat};
use crate::graph::{ChartData, GraphComposer};
use crate::render::{Frame, Renderer};
use crate::stats::{self, ColumnStats, Summary};
use crate::table::{self, TableRow, TableView};
use crate::Result;

/// One running experiment.
#[derive(Debug, Clone)]
pub struct ExperimentSession {
    controls: ControlPanel,
    log: ReadingLog,
    config: LabConfig,
    renderer: Renderer,
    graph: GraphComposer,
    table: TableView,
}

impl ExperimentSession {
    /// Session with default configuration.
    #[must_use]
    pub fn new(apparatus: Apparatus) -> Self {
        Self::with_config(apparatus, LabConfig::default())
    }

    /// Session with explicit configuration.
    #[must_use]
    pub fn with_config(apparatus: Apparatus, config: LabConfig) -> Self {
        debug!(apparatus = apparatus.id(), "session started");
        Self {
            controls: ControlPanel::new(apparatus),
            log: ReadingLog::new(),
            config,
            renderer: Renderer::new(config.viewport()),
            graph: GraphComposer::new(),
            table: TableView::new(config.table_precision()),
        }
    }

    /// Session for a catalog identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownApparatus` for an unknown identifier.
    pub fn from_id(id: &str) -> Result<Self> {
        Ok(Self::new(id.parse()?))
    }

    /// The active apparatus.
    #[must_use]
    pub const fn apparatus(&self) -> Apparatus {
        self.controls.apparatus()
    }

    /// Control panel state.
    #[must_use]
    pub const fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    /// The reading log.
    #[must_use]
    pub const fn log(&self) -> &ReadingLog {
        &self.log
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Name and grade for exports.
    #[must_use]
    pub fn meta(&self) -> ExperimentMeta {
        ExperimentMeta::from(self.apparatus())
    }

    /// Set a control (clamped) and return the fresh evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownParameter` for an undeclared control.
    pub fn set_parameter(&mut self, id: &str, raw: f64) -> Result<Evaluation> {
        self.controls.update(id, raw)
    }

    /// Restore default control values.
    pub fn reset_controls(&mut self) {
        self.controls.reset();
    }

    /// Evaluate the model at the current controls.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        self.controls.evaluate()
    }

    /// Rendered frame at animation time `t`.
    #[must_use]
    pub fn frame(&self, t: f64) -> Frame {
        self.renderer.frame(&self.evaluate(), t)
    }

    /// Record the current controls and derived outputs as a reading.
    pub fn record(&mut self) -> Option<usize> {
        let evaluation = self.evaluate();
        self.log
            .record(self.controls.values().to_fields(), evaluation.derived)
    }

    /// Empty the current run.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Save the current run with a snapshot of the control values.
    pub fn save_run(&mut self, label: &str) -> Option<&Run> {
        let controls = self.controls.values().to_fields();
        self.log.save_with_controls(label, controls)
    }

    /// Remove a saved run.
    pub fn delete_run(&mut self, selector: impl Into<RunSelector>) -> Option<Run> {
        self.log.delete_run(&selector.into())
    }

    /// Flip a saved run's graph visibility.
    pub fn toggle_run(&mut self, selector: impl Into<RunSelector>) -> Option<bool> {
        self.log.toggle_visibility(&selector.into())
    }

    /// Append previously archived runs.
    pub fn restore_runs(&mut self, runs: impl IntoIterator<Item = Run>) {
        self.log.restore_runs(runs);
    }

    /// Current readings that pass the table's filter, in log order.
    #[must_use]
    pub fn filtered_readings(&self) -> Vec<Reading> {
        table::filter(self.log.current(), self.table.query())
    }

    /// Statistics of one column over the filtered current readings.
    #[must_use]
    pub fn stats(&self, key: &str) -> Option<ColumnStats> {
        stats::column_stats(&self.filtered_readings(), key)
    }

    /// Error-analysis summary of one column over the filtered current
    /// readings.
    #[must_use]
    pub fn summary(&self, key: &str) -> Option<Summary> {
        let readings = self.filtered_readings();
        stats::summarize(&stats::numeric(stats::column(&readings, key)))
    }

    /// Graph composer state.
    pub fn graph_mut(&mut self) -> &mut GraphComposer {
        &mut self.graph
    }

    /// Chart data for the current log.
    pub fn chart(&mut self) -> Option<ChartData> {
        self.graph.compose(&self.log)
    }

    /// Table view state.
    pub fn table_mut(&mut self) -> &mut TableView {
        &mut self.table
    }

    /// Column headers for the current readings.
    #[must_use]
    pub fn table_columns(&self) -> Vec<String> {
        self.table.columns(self.log.current())
    }

    /// Filtered, sorted rows of the current readings.
    #[must_use]
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.table.rows(self.log.current())
    }

    /// Build an export; `Ok(None)` when there is nothing to export.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if JSON encoding fails.
    pub fn export(&self, format: ExportFormat) -> Result<Option<Download>> {
        export::export(
            format,
            &self.meta(),
            self.log.current(),
            self.log.runs(),
            self.config.report_precision(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;

    #[test]
    fn test_record_snapshots_controls_and_outputs() {
        let mut session = ExperimentSession::new(Apparatus::MeterBridge);
        session.set_parameter("knownR", 10.0).unwrap();
        session.set_parameter("unknownR", 15.0).unwrap();
        assert_eq!(session.record(), Some(0));

        let reading = &session.log().current()[0];
        assert_eq!(reading.inputs().get("knownR"), Some(&Quantity::Number(10.0)));
        let balance = reading.get("balancePoint").and_then(Quantity::as_f64).unwrap();
        assert!((balance - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_run_keeps_controls() {
        let mut session = ExperimentSession::new(Apparatus::Potentiometer);
        session.record();
        let run = session.save_run("").unwrap();
        assert_eq!(run.label(), "Run 1");
        assert!(run.controls().contains_key("emf1"));
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_empty_session_exports_nothing() {
        let session = ExperimentSession::new(Apparatus::Galvanometer);
        assert!(session.export(ExportFormat::Csv).unwrap().is_none());
        assert!(session.stats("shuntResistance").is_none());
        assert!(session.table_rows().is_empty());
    }

    #[test]
    fn test_stats_follow_table_filter() {
        let mut session = ExperimentSession::new(Apparatus::EmInduction);
        for turns in [10.0, 30.0, 200.0] {
            session.set_parameter("turns", turns).unwrap();
            session.record();
        }
        assert_eq!(session.stats("turns").map(|s| s.n), Some(3));

        session.table_mut().set_query("200");
        let stats = session.stats("turns").unwrap();
        assert_eq!(stats.n, 1);
        assert!((stats.mean - 200.0).abs() < 1e-9);
        assert_eq!(session.summary("turns").map(|s| s.stats.n), Some(1));

        session.table_mut().set_query("zzz-no-match");
        assert!(session.table_rows().is_empty());
        assert!(session.stats("turns").is_none());
        assert!(session.summary("emf").is_none());
        assert_eq!(session.log().len(), 3);
    }

    #[test]
    fn test_from_id() {
        assert!(ExperimentSession::from_id("em-induction").is_ok());
        assert!(ExperimentSession::from_id("optics-bench").is_err());
    }
}
