//! Export formatter - CSV, JSON and statistics report builders
//!
//! All builders are pure string functions over readings and runs. Writing
//! the result somewhere (browser download, file, key-value store) is the
//! host's job; [`Download`] only describes what to hand over.
//!
//! Every builder returns `None` when there is nothing to export, which is
//! how a host knows to keep its export controls disabled.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::apparatus::Apparatus;
use crate::error::Result;
use crate::experiment::{Reading, Run};
use crate::graph::CURRENT_LABEL;
use crate::quantity::{Fields, Quantity};
use crate::stats::{compute_stats, numeric};
use crate::table::ROW_NUMBER;

/// Column naming the source run in multi-run exports.
pub const RUN_COLUMN: &str = "_run";

/// Filename stem used when the experiment has no name.
pub const FALLBACK_NAME: &str = "data";

/// Default decimals in the statistics report.
pub const REPORT_PRECISION: usize = 6;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated table.
    Csv,
    /// Structured document with metadata.
    Json,
    /// Plain-text statistics report.
    Stats,
}

impl ExportFormat {
    /// MIME type handed to the host.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Stats => "text/plain",
        }
    }

    /// Filename for an experiment (falls back to `data`).
    #[must_use]
    pub fn filename(self, experiment: Option<&str>) -> String {
        let stem = experiment
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_NAME);
        match self {
            Self::Csv => format!("{stem}_export.csv"),
            Self::Json => format!("{stem}_export.json"),
            Self::Stats => format!("{stem}_stats.txt"),
        }
    }
}

/// Content plus the metadata a host needs to save it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    /// File body.
    pub content: String,
    /// Suggested filename.
    pub filename: String,
    /// MIME type.
    pub mime: &'static str,
}

/// Experiment identity written into exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentMeta {
    /// Display name.
    pub name: Option<String>,
    /// Curriculum grade.
    pub grade: Option<String>,
}

impl From<Apparatus> for ExperimentMeta {
    fn from(apparatus: Apparatus) -> Self {
        Self {
            name: Some(apparatus.name().to_string()),
            grade: Some(apparatus.grade().to_string()),
        }
    }
}

/// Flattened rows: with saved runs, every run's readings plus a trailing
/// `_run` column; otherwise the current readings with a leading 1-based
/// `#` column.
#[must_use]
pub fn summary_rows(current: &[Reading], runs: &[Run]) -> Vec<Fields> {
    if runs.is_empty() {
        current
            .iter()
            .enumerate()
            .map(|(i, reading)| {
                let mut row = Fields::new();
                #[allow(clippy::cast_precision_loss)]
                row.insert(ROW_NUMBER, (i + 1) as f64);
                for (key, value) in reading.flatten().iter() {
                    row.insert(key, value.clone());
                }
                row
            })
            .collect()
    } else {
        runs.iter()
            .flat_map(|run| {
                run.readings().iter().map(move |reading| {
                    let mut row = reading.flatten();
                    row.insert(RUN_COLUMN, run.label());
                    row
                })
            })
            .collect()
    }
}

fn csv_cell(value: Option<&Quantity>) -> String {
    match value {
        None | Some(Quantity::Undefined) => String::new(),
        Some(q) => q.to_string(),
    }
}

/// CSV over flattened rows. Headers come from the first row; missing and
/// undefined cells are empty. `Ok(None)` when there are no rows.
///
/// # Errors
///
/// Returns `Error::Csv` if a record cannot be written and `Error::Io` if
/// the buffer cannot be flushed.
pub fn rows_to_csv(rows: &[Fields]) -> Result<Option<String>> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let headers: Vec<&str> = first.keys().collect();
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|h| csv_cell(row.get(h))))?;
    }
    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    // No terminator after the last record.
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(Some(content))
}

/// CSV of the current readings, or of every saved run when any exist.
///
/// # Errors
///
/// See [`rows_to_csv`].
pub fn to_csv(current: &[Reading], runs: &[Run]) -> Result<Option<String>> {
    rows_to_csv(&summary_rows(current, runs))
}

/// One run inside an [`ExportDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunExport {
    /// Run label.
    pub label: String,
    /// Readings in recording order.
    pub readings: Vec<Reading>,
}

/// JSON export payload; also the persistence format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Experiment name.
    pub experiment: Option<String>,
    /// Curriculum grade.
    pub grade: Option<String>,
    /// Export time (RFC 3339).
    pub exported_at: DateTime<Utc>,
    /// Saved runs, or the current readings as a single `Current` run.
    pub runs: Vec<RunExport>,
    /// Flattened rows, as in the CSV.
    pub summary: Vec<Fields>,
}

impl ExportDocument {
    /// Build a document stamped now. `None` when there are no readings.
    #[must_use]
    pub fn new(meta: &ExperimentMeta, current: &[Reading], runs: &[Run]) -> Option<Self> {
        Self::at(meta, current, runs, Utc::now())
    }

    /// Build a document with an explicit timestamp.
    #[must_use]
    pub fn at(
        meta: &ExperimentMeta,
        current: &[Reading],
        runs: &[Run],
        exported_at: DateTime<Utc>,
    ) -> Option<Self> {
        let summary = summary_rows(current, runs);
        if summary.is_empty() {
            return None;
        }
        let runs = if runs.is_empty() {
            vec![RunExport {
                label: CURRENT_LABEL.to_string(),
                readings: current.to_vec(),
            }]
        } else {
            runs.iter()
                .map(|run| RunExport {
                    label: run.label().to_string(),
                    readings: run.readings().to_vec(),
                })
                .collect()
        };
        Some(Self {
            experiment: meta.name.clone(),
            grade: meta.grade.clone(),
            exported_at,
            runs,
            summary,
        })
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously exported document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Readings of every run, concatenated in order.
    pub fn readings(&self) -> impl Iterator<Item = &Reading> {
        self.runs.iter().flat_map(|r| r.readings.iter())
    }

    /// Convert back into saved runs, stamped with the export time.
    #[must_use]
    pub fn into_runs(self) -> Vec<Run> {
        let saved_at = self.exported_at;
        self.runs
            .into_iter()
            .map(|r| Run::new(r.label, r.readings).saved_at_time(saved_at))
            .collect()
    }
}

/// Plain-text statistics report over the output columns of `readings`.
///
/// Output keys come from the first reading; columns with no numeric value
/// are skipped. `None` when `readings` is empty.
#[must_use]
pub fn stats_report(
    experiment: Option<&str>,
    readings: &[Reading],
    precision: usize,
    date: DateTime<Utc>,
) -> Option<String> {
    let first = readings.first()?;
    let mut out = String::new();
    let _ = writeln!(out, "Statistical Analysis Report");
    let _ = writeln!(out, "Experiment: {}", experiment.unwrap_or_default());
    let _ = writeln!(out, "Date: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
    out.push('\n');

    for key in first.outputs().keys() {
        let values = numeric(readings.iter().filter_map(|r| r.outputs().get(key)));
        let Some(stats) = compute_stats(&values) else {
            continue;
        };
        let _ = writeln!(out, "Variable: {key}");
        let _ = writeln!(out, "  N = {}", stats.n);
        let _ = writeln!(out, "  Mean = {:.precision$}", stats.mean);
        let _ = writeln!(out, "  Std Dev = {:.precision$}", stats.std_dev);
        let _ = writeln!(out, "  Min = {:.precision$}", stats.min);
        let _ = writeln!(out, "  Max = {:.precision$}", stats.max);
        out.push('\n');
    }
    Some(out)
}

/// Build a [`Download`] in `format`.
///
/// CSV and JSON cover saved runs when any exist; the statistics report
/// always covers the current readings. `Ok(None)` means nothing to export.
///
/// # Errors
///
/// Returns `Error::Serialization` if JSON encoding fails and `Error::Csv`
/// if CSV writing fails.
pub fn export(
    format: ExportFormat,
    meta: &ExperimentMeta,
    current: &[Reading],
    runs: &[Run],
    precision: usize,
) -> Result<Option<Download>> {
    let content = match format {
        ExportFormat::Csv => to_csv(current, runs)?,
        ExportFormat::Json => ExportDocument::new(meta, current, runs)
            .map(|doc| doc.to_json())
            .transpose()?,
        ExportFormat::Stats => stats_report(meta.name.as_deref(), current, precision, Utc::now()),
    };
    Ok(content.map(|content| Download {
        content,
        filename: format.filename(meta.name.as_deref()),
        mime: format.mime(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(x: f64, y: f64) -> Reading {
        Reading::new(
            [("x", x)].into_iter().collect(),
            [("y", y)].into_iter().collect(),
        )
    }

    #[test]
    fn test_single_run_csv() {
        let csv = to_csv(&[reading(1.0, 2.5), reading(2.0, 5.0)], &[]).unwrap().unwrap();
        assert_eq!(csv, "#,x,y\n1,1,2.5\n2,2,5");
    }

    #[test]
    fn test_multi_run_csv_has_run_column() {
        let runs = vec![
            Run::new("A", vec![reading(1.0, 2.0)]),
            Run::new("B, second", vec![reading(3.0, 4.0)]),
        ];
        let csv = to_csv(&[], &runs).unwrap().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "x,y,_run");
        assert_eq!(lines[2], "3,4,\"B, second\"");
    }

    #[test]
    fn test_csv_quotes_text_cells() {
        let r = Reading::new(
            [("x", 1.0)].into_iter().collect(),
            [("note", Quantity::from("say \"hi\"\nthen go"))].into_iter().collect(),
        );
        let csv = to_csv(&[r], &[]).unwrap().unwrap();
        assert_eq!(csv, "#,x,note\n1,1,\"say \"\"hi\"\"\nthen go\"");
    }

    #[test]
    fn test_empty_exports_disabled() {
        assert!(to_csv(&[], &[]).unwrap().is_none());
        assert!(ExportDocument::new(&ExperimentMeta::default(), &[], &[]).is_none());
        assert!(stats_report(None, &[], 6, Utc::now()).is_none());
        let download = export(ExportFormat::Json, &ExperimentMeta::default(), &[], &[], 6).unwrap();
        assert!(download.is_none());
    }

    #[test]
    fn test_undefined_cell_is_empty() {
        let r = Reading::new(
            [("x", 1.0)].into_iter().collect(),
            [("y", Quantity::Undefined)].into_iter().collect(),
        );
        assert_eq!(to_csv(&[r], &[]).unwrap().unwrap(), "#,x,y\n1,1,");
    }

    #[test]
    fn test_filenames() {
        assert_eq!(ExportFormat::Csv.filename(Some("Meter Bridge")), "Meter Bridge_export.csv");
        assert_eq!(ExportFormat::Stats.filename(None), "data_stats.txt");
        assert_eq!(ExportFormat::Json.mime(), "application/json");
    }

    #[test]
    fn test_stats_report_layout() {
        let date = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = stats_report(
            Some("Potentiometer"),
            &[reading(1.0, 2.0), reading(2.0, 4.0)],
            6,
            date,
        )
        .unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Statistical Analysis Report");
        assert_eq!(lines[1], "Experiment: Potentiometer");
        assert_eq!(lines[2], "Date: 2024-03-01 10:00:00 UTC");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Variable: y");
        assert_eq!(lines[5], "  N = 2");
        assert_eq!(lines[6], "  Mean = 3.000000");
        assert_eq!(lines[7], "  Std Dev = 1.414214");
    }
}
