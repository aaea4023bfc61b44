//! Experiment data model - readings, runs, the reading log and sessions
//!
//! ## Ownership
//!
//! ```text
//! ExperimentSession (1) ── ReadingLog (1)
//!                              ├──< Reading (N)  current, unsaved
//!                              └──< Run (N) ──< Reading (N)  saved, immutable
//! ```
//!
//! The session owns the log; graph, table, statistics and export only ever
//! read from it.
//!
//! ## Usage
//!
//! ```rust
//! use physlab::apparatus::Apparatus;
//! use physlab::experiment::ExperimentSession;
//!
//! let mut session = ExperimentSession::new(Apparatus::MeterBridge);
//! session.set_parameter("knownR", 10.0).unwrap();
//! session.record();
//! session.save_run("Trial A");
//! assert_eq!(session.log().run_count(), 1);
//! ```

mod log;
mod reading;
mod run;
mod session;

pub use log::ReadingLog;
pub use reading::Reading;
pub use run::{Run, RunSelector};
pub use session::ExperimentSession;
