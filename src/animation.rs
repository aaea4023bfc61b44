//! Animation clock - fixed-cadence ticks for redrawing animated schematics
//!
//! The clock owns one background task driven by `tokio::time::interval`.
//! The [`AnimationHandle`] it returns is the only way to end that task:
//!
//! - [`AnimationHandle::stop`] signals cancellation and joins the task, so
//!   once it returns no further tick callback can run.
//! - Dropping the handle closes the stop channel; the task exits at its
//!   next wake-up without being joined.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::LabConfig;

/// One animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Seconds since the clock started; the `t` passed to the renderer.
    pub elapsed: f64,
}

/// Periodic tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    period: Duration,
}

impl AnimationClock {
    /// Clock ticking every `period` (at least 1 ms).
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Clock at the configured frame rate.
    #[must_use]
    pub fn from_config(config: &LabConfig) -> Self {
        Self::new(config.frame_interval())
    }

    /// Tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the tick task on the current runtime.
    ///
    /// `on_tick` runs on the task for every frame until the handle is
    /// stopped or dropped. Late ticks are skipped rather than bunched.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<F>(&self, mut on_tick: F) -> AnimationHandle
    where
        F: FnMut(Tick) + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let started = Instant::now();
            let mut frame = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        on_tick(Tick {
                            frame,
                            elapsed: started.elapsed().as_secs_f64(),
                        });
                        frame += 1;
                    }
                }
            }
            frame
        });

        debug!(period_ms = period.as_millis(), "animation clock started");
        AnimationHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Owner of a running animation task.
#[derive(Debug)]
pub struct AnimationHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<u64>>,
}

impl AnimationHandle {
    /// Whether the tick task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and wait for the task to exit.
    ///
    /// Returns the number of frames delivered.
    pub async fn stop(mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            // Err only means the task already exited.
            let _ = stop.send(());
        }
        let Some(task) = self.task.take() else {
            return 0;
        };
        match task.await {
            Ok(frames) => {
                debug!(frames, "animation clock stopped");
                frames
            }
            Err(err) => {
                warn!(%err, "animation task ended abnormally");
                0
            }
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
