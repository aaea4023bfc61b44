//! Lab Session Demo - one meter bridge experiment end to end
//!
//! Run with: `cargo run --example lab_session`
//! Set `RUST_LOG=physlab=debug` to see the session log events.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use physlab::animation::AnimationClock;
use physlab::apparatus::Apparatus;
use physlab::experiment::ExperimentSession;
use physlab::export::ExportFormat;
use physlab::graph::AxisSelection;
use physlab::kv::{MemoryKvStore, RunArchive};
use physlab::LabConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("physlab=info")),
        )
        .init();

    println!("=== physlab Meter Bridge Session ===\n");

    let config = LabConfig::builder().frame_rate(30).viewport(1024.0, 640.0).build();
    let mut session = ExperimentSession::with_config(Apparatus::MeterBridge, config);

    // 1. Take readings for two unknown resistors
    for (label, unknown) in [("S = 150 Ω", 150.0), ("S = 300 Ω", 300.0)] {
        session.set_parameter("unknownR", unknown)?;
        for known in [50.0, 100.0, 200.0, 400.0] {
            session.set_parameter("knownR", known)?;
            session.record();
        }
        let run = session.save_run(label).context("run had no readings")?;
        println!("1. Saved '{}' with {} readings", run.label(), run.len());
    }

    // 2. Compare the runs
    println!("\n2. Balance point per run");
    for run in session.log().runs() {
        let stats = physlab::stats::column_stats(run.readings(), "balancePoint")
            .context("balance point column is empty")?;
        println!(
            "   {:<10} mean = {:.2} cm, sd = {:.2} cm",
            run.label(),
            stats.mean,
            stats.std_dev
        );
    }

    // 3. Chart data for the host
    session
        .graph_mut()
        .select(AxisSelection::new("knownR", ["balancePoint"]));
    let chart = session.chart().context("not enough variables to plot")?;
    println!("\n3. Chart: {} series", chart.series.len());
    for series in &chart.series {
        println!("   {} ({}): {} points", series.label, series.color.to_hex(), series.points.len());
    }

    // 4. Animate the schematic for a few frames
    let frames = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&frames);
    let eval = session.evaluate();
    let renderer = physlab::render::Renderer::new(config.viewport());
    let handle = AnimationClock::from_config(&config).start(move |tick| {
        let frame = renderer.frame(&eval, tick.elapsed);
        if let Ok(mut n) = counter.lock() {
            *n += frame.commands.len();
        }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    let ticks = handle.stop().await;
    let commands = frames.lock().map(|n| *n).unwrap_or_default();
    println!("\n4. Animation: {ticks} ticks, {commands} draw commands issued");

    // 5. Export and archive
    let csv = session
        .export(ExportFormat::Csv)?
        .context("nothing to export")?;
    println!("\n5. {} ({}), {} bytes", csv.filename, csv.mime, csv.content.len());

    let archive = RunArchive::new(MemoryKvStore::new());
    archive
        .save_log(Apparatus::MeterBridge.id(), &session.meta(), session.log())
        .await?;
    let document = archive
        .load(Apparatus::MeterBridge.id())
        .await?
        .context("archive entry missing")?;
    let mut restored = ExperimentSession::new(Apparatus::MeterBridge);
    restored.restore_runs(document.into_runs());
    println!(
        "   Archived {:?}, restored {} runs",
        archive.store().session_ids(),
        restored.log().run_count()
    );

    Ok(())
}
