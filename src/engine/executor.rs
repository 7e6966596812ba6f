//! Concurrent fan-out/fan-in over the probe set.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use super::results::{ProbeResult, ResultSet};
use crate::observability::metrics;
use crate::probe::{Outcome, ProbeFault, ProbeSpec};

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// Every probe reported.
    Completed(ResultSet),
    /// The enclosing token fired before every probe reported. Whatever was
    /// collected is dropped; this is never published.
    Cancelled,
}

/// Runs the configured probe set.
///
/// Cheap to clone: the probe definitions are shared.
#[derive(Debug, Clone)]
pub struct Engine {
    probes: Arc<[ProbeSpec]>,
}

impl Engine {
    pub fn new(probes: Vec<ProbeSpec>) -> Self {
        Self {
            probes: probes.into(),
        }
    }

    pub fn probes(&self) -> &[ProbeSpec] {
        &self.probes
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Run every probe once, concurrently, and collect the results in
    /// configuration order.
    ///
    /// Returns only when all probes have reported or `cancel` fires.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleReport {
        let total = self.probes.len();
        if total == 0 {
            return CycleReport::Completed(ResultSet::default());
        }

        let (tx, mut rx) = mpsc::channel::<(usize, Outcome)>(total);
        let mut reporters = JoinSet::new();

        for index in 0..total {
            let probes = Arc::clone(&self.probes);
            let cancel = cancel.clone();
            let tx = tx.clone();

            reporters.spawn(async move {
                let started = Instant::now();
                // The probe runs in its own task so a panic is caught at the
                // join and reported instead of taking down the cycle.
                let probe_task = {
                    let probes = Arc::clone(&probes);
                    tokio::spawn(async move { probes[index].run(&cancel).await })
                };
                let outcome = match probe_task.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(probe = %probes[index].name(), error = %e, "Probe task failed");
                        Outcome::from_fault(ProbeFault::Panicked(panic_message(e)), started.elapsed())
                    }
                };
                let _ = tx.send((index, outcome)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Outcome>> = (0..total).map(|_| None).collect();
        let mut received = 0;

        while received < total {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(received, total, "Cycle cancelled before all probes reported");
                    reporters.abort_all();
                    return CycleReport::Cancelled;
                }
                report = rx.recv() => match report {
                    Some((index, outcome)) => {
                        if slots[index].replace(outcome).is_none() {
                            received += 1;
                        }
                    }
                    None => {
                        tracing::error!(received, total, "Probe reporters exited before the cycle completed");
                        return CycleReport::Cancelled;
                    }
                }
            }
        }

        let entries: Option<Vec<ProbeResult>> = slots
            .into_iter()
            .zip(self.probes.iter())
            .map(|(slot, spec)| slot.map(|outcome| ProbeResult::new(spec, outcome)))
            .collect();

        match entries {
            Some(entries) => {
                for entry in &entries {
                    metrics::record_probe(&entry.name, entry.healthy, entry.elapsed);
                }
                CycleReport::Completed(ResultSet::new(entries))
            }
            None => CycleReport::Cancelled,
        }
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_engine_completes_immediately() {
        let engine = Engine::new(Vec::new());
        assert_eq!(
            engine.run_cycle(&CancellationToken::new()).await,
            CycleReport::Completed(ResultSet::default())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_panicking_probe_is_isolated() {
        use crate::config::CheckConfig;
        use std::time::Duration;

        let check = CheckConfig::shell("exit 0", Duration::from_secs(2));
        let engine = Engine::new(vec![
            ProbeSpec::from_config(0, &check).unwrap(),
            ProbeSpec::panicking("exploder", "boom"),
            ProbeSpec::from_config(2, &check).unwrap(),
        ]);

        let results = match engine.run_cycle(&CancellationToken::new()).await {
            CycleReport::Completed(results) => results,
            CycleReport::Cancelled => panic!("cycle was not expected to cancel"),
        };

        assert_eq!(results.len(), 3);
        let entries = results.entries();
        assert!(entries[0].healthy, "{}", entries[0].detail);
        assert_eq!(entries[1].name, "exploder");
        assert!(!entries[1].healthy);
        assert_eq!(entries[1].detail, "probe panicked: boom");
        assert!(entries[2].healthy, "{}", entries[2].detail);
    }

    #[tokio::test]
    async fn test_join_error_message() {
        let handle = tokio::spawn(async { panic!("probe exploded") });
        let err = handle.await.unwrap_err();
        assert_eq!(panic_message(err), "probe exploded");
    }
}
