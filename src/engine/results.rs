//! Cycle results and the aggregate snapshot served to readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProbeKind;
use crate::probe::{Outcome, ProbeSpec};

/// One probe's entry in a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    pub kind: ProbeKind,
    pub healthy: bool,
    pub detail: String,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn new(spec: &ProbeSpec, outcome: Outcome) -> Self {
        Self {
            name: spec.name().to_string(),
            kind: spec.kind(),
            healthy: outcome.healthy,
            detail: outcome.detail,
            elapsed: outcome.elapsed,
        }
    }
}

/// Every outcome of one complete cycle, in configuration order.
///
/// Only ever constructed from a complete cycle: it always holds exactly one
/// entry per configured probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: Vec<ProbeResult>,
}

impl ResultSet {
    pub fn new(entries: Vec<ProbeResult>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ProbeResult] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reduced verdict of one cycle, plus the full result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub overall_healthy: bool,
    /// 1-based cycle number within this process.
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub results: ResultSet,
}
