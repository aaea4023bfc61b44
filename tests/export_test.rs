//! Export formatter integration tests

use chrono::{DateTime, Utc};
use physlab::apparatus::Apparatus;
use physlab::experiment::ExperimentSession;
use physlab::export::{
    rows_to_csv, stats_report, summary_rows, ExperimentMeta, ExportDocument, ExportFormat,
    RUN_COLUMN,
};
use physlab::kv::{MemoryKvStore, RunArchive};
use physlab::quantity::Quantity;

fn galvanometer_session() -> ExperimentSession {
    let mut session = ExperimentSession::new(Apparatus::Galvanometer);
    for ig in [0.01, 0.02, 0.05] {
        session.set_parameter("Ig", ig).unwrap();
        session.record();
    }
    session
}

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_csv_download_descriptor() {
    let session = galvanometer_session();
    let download = session.export(ExportFormat::Csv).unwrap().unwrap();
    assert_eq!(download.filename, "Galvanometer Conversion_export.csv");
    assert_eq!(download.mime, "text/csv");

    let lines: Vec<&str> = download.content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("#,Ig,G,I,V,shuntResistance"));
    assert!(lines[1].starts_with("1,0.01,50,1,10,"));
}

#[test]
fn test_csv_multi_run_union() {
    let mut session = galvanometer_session();
    session.save_run("Fine");
    session.set_parameter("Ig", 0.1).unwrap();
    session.set_parameter("I", 0.1).unwrap();
    session.record();
    session.save_run("Singular");

    let rows = summary_rows(session.log().current(), session.log().runs());
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].get(RUN_COLUMN), Some(&Quantity::from("Singular")));

    let csv = rows_to_csv(&rows).unwrap().unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.ends_with(",_run"));
    // Undefined shunt resistance exports as an empty cell
    let last = csv.lines().last().unwrap();
    assert!(last.contains(",,"));
    assert!(last.ends_with(",Singular"));
}

#[test]
fn test_json_round_trip_preserves_readings() {
    let session = galvanometer_session();
    let doc = ExportDocument::at(
        &session.meta(),
        session.log().current(),
        session.log().runs(),
        fixed_time(),
    )
    .unwrap();
    let json = doc.to_json().unwrap();
    assert!(json.contains("\"exported_at\": \"2024-05-01T12:30:00Z\""));
    assert!(json.contains("\"grade\": \"class12\""));

    let back = ExportDocument::from_json(&json).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.runs.len(), 1);
    assert_eq!(back.runs[0].label, "Current");
    let readings: Vec<_> = back.readings().cloned().collect();
    assert_eq!(readings.as_slice(), session.log().current());
}

#[test]
fn test_json_marks_undefined_as_null() {
    let mut session = ExperimentSession::new(Apparatus::Galvanometer);
    session.set_parameter("Ig", 0.1).unwrap();
    session.set_parameter("I", 0.1).unwrap();
    session.record();
    let json = session.export(ExportFormat::Json).unwrap().unwrap().content;
    assert!(json.contains("\"shuntResistance\": null"));
}

#[test]
fn test_stats_report_blocks() {
    let session = galvanometer_session();
    let report = stats_report(
        Some("Galvanometer Conversion"),
        session.log().current(),
        6,
        fixed_time(),
    )
    .unwrap();
    assert!(report.starts_with("Statistical Analysis Report\nExperiment: Galvanometer Conversion\n"));
    assert!(report.contains("Variable: shuntResistance\n  N = 3\n"));
    assert!(report.contains("Variable: fullScaleCurrent_mA\n  N = 3\n  Mean = 26.666667\n"));
    assert!(report.contains("  Min = 10.000000"));
}

#[test]
fn test_empty_session_disables_every_export() {
    let session = ExperimentSession::new(Apparatus::Potentiometer);
    for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Stats] {
        assert!(session.export(format).unwrap().is_none());
    }
    assert!(ExportDocument::new(&ExperimentMeta::default(), &[], &[]).is_none());
}

#[tokio::test]
async fn test_archive_restores_runs_into_new_session() {
    let archive = RunArchive::new(MemoryKvStore::new());
    let mut session = galvanometer_session();
    session.save_run("Morning");
    assert!(archive
        .save_log("galvanometer", &session.meta(), session.log())
        .await
        .unwrap());

    let mut fresh = ExperimentSession::new(Apparatus::Galvanometer);
    let doc = archive.load("galvanometer").await.unwrap().unwrap();
    fresh.restore_runs(doc.into_runs());
    assert_eq!(fresh.log().run_count(), 1);
    assert_eq!(fresh.log().runs()[0].label(), "Morning");
    assert_eq!(fresh.log().runs()[0].readings(), session.log().runs()[0].readings());
}
