//! One-shot mode: run every probe once, print the results, exit.
//!
//! # Exit codes
//! | code | meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | every probe healthy                                       |
//! | 1    | at least one probe unhealthy                              |
//! | 2    | fatal: configuration or serialization failure             |
//! | 3    | interrupted by a termination request, nothing printed     |

use std::io::Write;
use tokio_util::sync::CancellationToken;

use crate::engine::{overall_health, CycleReport, Engine, ResultSet};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Healthy,
    Unhealthy,
    Fatal,
    Interrupted,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Healthy => 0,
            ExitStatus::Unhealthy => 1,
            ExitStatus::Fatal => 2,
            ExitStatus::Interrupted => 3,
        }
    }

    pub fn for_results(results: &ResultSet) -> Self {
        if overall_health(results) {
            ExitStatus::Healthy
        } else {
            ExitStatus::Unhealthy
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Write the result set as pretty JSON followed by a newline.
pub fn write_results<W: Write>(results: &ResultSet, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Run one cycle under `cancel` and report it to `out`.
pub async fn run<W: Write>(engine: &Engine, cancel: &CancellationToken, out: &mut W) -> ExitStatus {
    tracing::debug!(probes = engine.len(), "Running probes once");

    let results = match engine.run_cycle(cancel).await {
        CycleReport::Completed(results) => results,
        CycleReport::Cancelled => {
            tracing::warn!("Interrupted before every probe reported");
            return ExitStatus::Interrupted;
        }
    };

    match write_results(&results, out) {
        Ok(()) => ExitStatus::for_results(&results),
        Err(e) => {
            tracing::error!(error = %e, "Cannot serialize results");
            ExitStatus::Fatal
        }
    }
}
