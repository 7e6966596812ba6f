//! Health probes.
//!
//! # Variants
//! ```text
//! Probe::Shell    → /bin/sh -c "<exec>"        (pipes, redirection allowed)
//! Probe::Command  → <program> <args...>         (no interpreter involved)
//! Probe::Network  → GET <url>, status ∈ accepted set
//! ```
//!
//! # Contract
//! `execute(timeout, cancel)` always yields an [`Outcome`]. It never waits
//! past `timeout`, and returns promptly once `cancel` fires. Failures of any
//! sort are reported as unhealthy outcomes, never as errors.
//!
//! The set of variants is closed: adding a kind means adding a variant here
//! and an arm in [`ProbeSpec::from_config`].

pub mod command;
pub mod network;
mod process;
pub mod shell;

use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{CheckConfig, ProbeKind};
use crate::error::ConfigurationError;

pub use command::CommandProbe;
pub use network::NetworkProbe;
pub use shell::ShellProbe;

/// Result of running one probe once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub healthy: bool,
    pub detail: String,
    pub elapsed: Duration,
}

impl Outcome {
    pub fn healthy(detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            healthy: true,
            detail: detail.into(),
            elapsed,
        }
    }

    pub fn unhealthy(detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            healthy: false,
            detail: detail.into(),
            elapsed,
        }
    }

    /// Convert an execution fault into an unhealthy outcome.
    pub fn from_fault(fault: ProbeFault, elapsed: Duration) -> Self {
        Self::unhealthy(fault.to_string(), elapsed)
    }
}

/// Anything that went wrong while executing a probe.
///
/// Never propagated: the engine turns every fault into an unhealthy outcome.
#[derive(Debug, Error)]
pub enum ProbeFault {
    #[error("executable '{program}' not found")]
    NotFound { program: String },

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for process: {0}")]
    Wait(std::io::Error),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("cancelled")]
    Cancelled,

    #[error("probe panicked: {0}")]
    Panicked(String),
}

/// The three probe variants behind one capability.
#[derive(Debug)]
pub enum Probe {
    Shell(ShellProbe),
    Command(CommandProbe),
    Network(NetworkProbe),
    #[cfg(test)]
    Panicking(&'static str),
}

impl Probe {
    pub async fn execute(&self, timeout: Duration, cancel: &CancellationToken) -> Outcome {
        match self {
            Probe::Shell(p) => p.execute(timeout, cancel).await,
            Probe::Command(p) => p.execute(timeout, cancel).await,
            Probe::Network(p) => p.execute(timeout, cancel).await,
            #[cfg(test)]
            Probe::Panicking(message) => panic!("{message}"),
        }
    }
}

/// Immutable, validated definition of one configured probe.
#[derive(Debug)]
pub struct ProbeSpec {
    name: String,
    kind: ProbeKind,
    timeout: Duration,
    probe: Probe,
}

impl ProbeSpec {
    /// Build a probe from the `index`-th `[[checks]]` entry.
    pub fn from_config(index: usize, config: &CheckConfig) -> Result<Self, ConfigurationError> {
        let name = config.display_name(index);

        if config.timeout.is_zero() {
            return Err(ConfigurationError::NonPositiveTimeout { probe: name });
        }

        let probe = match config.kind {
            ProbeKind::Shell => Probe::Shell(ShellProbe::new(&name, config.exec.as_deref())?),
            ProbeKind::Command => Probe::Command(CommandProbe::new(&name, config.exec.as_deref())?),
            ProbeKind::Network => Probe::Network(NetworkProbe::new(
                &name,
                config.url.as_deref(),
                config.status_codes.as_deref(),
            )?),
        };

        Ok(Self {
            name,
            kind: config.kind,
            timeout: config.timeout,
            probe,
        })
    }

    #[cfg(test)]
    pub(crate) fn panicking(name: &str, message: &'static str) -> Self {
        Self {
            name: name.to_string(),
            kind: ProbeKind::Command,
            timeout: Duration::from_secs(1),
            probe: Probe::Panicking(message),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn probe(&self) -> &Probe {
        &self.probe
    }

    /// Execute the probe under its own configured timeout.
    pub async fn run(&self, cancel: &CancellationToken) -> Outcome {
        tracing::debug!(probe = %self.name, kind = %self.kind, timeout = ?self.timeout, "Running probe");
        let outcome = self.probe.execute(self.timeout, cancel).await;
        tracing::debug!(
            probe = %self.name,
            healthy = outcome.healthy,
            elapsed = ?outcome.elapsed,
            detail = %outcome.detail,
            "Probe finished"
        );
        outcome
    }
}

/// Build every configured probe, in order, failing on the first bad entry.
pub fn build_probes(checks: &[CheckConfig]) -> Result<Vec<ProbeSpec>, ConfigurationError> {
    checks
        .iter()
        .enumerate()
        .map(|(index, check)| ProbeSpec::from_config(index, check))
        .collect()
}
