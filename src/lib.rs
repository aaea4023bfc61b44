//! # physlab: Virtual Physics Laboratory Core
//!
//! **Version**: 0.1.0
//!
//! physlab simulates textbook electricity and magnetism apparatus, renders
//! their schematics as abstract draw commands, and manages the measurement
//! workflow around them: recording readings, saving runs, statistics,
//! graphing and export.
//!
//! ## Pipeline
//!
//! ```text
//! ControlPanel ──► Apparatus::compute ──► Renderer ──► Frame (draw commands)
//!                        │
//!                        └─(record)──► ReadingLog ──► stats / graph / table / export
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use physlab::apparatus::Apparatus;
//! use physlab::experiment::ExperimentSession;
//! use physlab::export::ExportFormat;
//!
//! let mut session = ExperimentSession::new(Apparatus::Potentiometer);
//! for emf in [1.2, 1.4, 1.6] {
//!     session.set_parameter("emf1", emf)?;
//!     session.record();
//! }
//! let stats = session.stats("balanceLength1").expect("three readings");
//! assert_eq!(stats.n, 3);
//!
//! let csv = session.export(ExportFormat::Csv)?.expect("log is not empty");
//! assert_eq!(csv.filename, "Potentiometer EMF_export.csv");
//! # Ok::<(), physlab::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[cfg(feature = "tokio")]
pub mod animation;
pub mod apparatus;
pub mod config;
pub mod controls;
pub mod error;
pub mod experiment;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod kv;
pub mod quantity;
pub mod render;
pub mod stats;
pub mod table;

pub use config::{LabConfig, LabConfigBuilder};
pub use error::{Error, Result};
pub use quantity::{Fields, Quantity};
