//! Periodic cycle driver.
//!
//! # States
//! ```text
//! Idle ──tick──▶ RunningCycle ──cycle done──▶ Idle
//!   │                                           │
//!   └───────────── shutdown token ──────────────┴──▶ Stopped
//! ```
//!
//! # Design Decisions
//! - First cycle runs immediately on start
//! - Period is measured from the start of the previous cycle; an overrunning
//!   cycle delays the next tick, cycles never overlap
//! - Shutdown is checked only between cycles: an in-flight cycle is drained
//!   under its own per-probe deadlines, then published
//! - Only the force token (second termination request) cancels an in-flight
//!   cycle; a cancelled cycle is discarded

use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::{aggregate, CycleReport, Engine};
use crate::health::snapshot::{self, SnapshotPublisher, SnapshotReader};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningCycle,
    Stopped,
}

pub struct Scheduler {
    engine: Engine,
    period: Duration,
    publisher: SnapshotPublisher,
    state: watch::Sender<SchedulerState>,
    cycle: u64,
}

impl Scheduler {
    pub fn new(engine: Engine, period: Duration) -> Self {
        let (publisher, _) = snapshot::slot();
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            engine,
            period,
            publisher,
            state,
            cycle: 0,
        }
    }

    /// Read handle for the status server.
    pub fn reader(&self) -> SnapshotReader {
        self.publisher.reader()
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Run cycles until the shutdown token fires.
    pub async fn run(mut self, shutdown: Shutdown) {
        let graceful = shutdown.token();
        let force = shutdown.force_token();

        tracing::info!(
            period = ?self.period,
            probes = self.engine.len(),
            "Scheduler starting"
        );

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = graceful.cancelled() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {}
            }
            self.run_once(&force).await;
        }

        self.state.send_replace(SchedulerState::Stopped);
        tracing::info!(cycles = self.cycle, "Scheduler stopped");
    }

    /// Run a single cycle and publish it. Returns whether a snapshot was
    /// published.
    pub async fn run_once(&mut self, cancel: &CancellationToken) -> bool {
        self.cycle += 1;
        let cycle = self.cycle;
        let started_at = Utc::now();
        let started = Instant::now();

        self.state.send_replace(SchedulerState::RunningCycle);
        let report = self.engine.run_cycle(cancel).await;
        self.state.send_replace(SchedulerState::Idle);

        match report {
            CycleReport::Completed(results) => {
                let snapshot = aggregate(results, cycle, started_at, Utc::now());
                metrics::record_cycle(snapshot.overall_healthy, started.elapsed());

                if snapshot.overall_healthy {
                    tracing::debug!(cycle, elapsed = ?started.elapsed(), "Cycle completed: healthy");
                } else {
                    let failing: Vec<&str> = snapshot
                        .results
                        .iter()
                        .filter(|r| !r.healthy)
                        .map(|r| r.name.as_str())
                        .collect();
                    tracing::warn!(cycle, failing = ?failing, "Cycle completed: unhealthy");
                }

                self.publisher.publish(snapshot);
                true
            }
            CycleReport::Cancelled => {
                tracing::info!(cycle, "Cycle cancelled, result discarded");
                false
            }
        }
    }
}
