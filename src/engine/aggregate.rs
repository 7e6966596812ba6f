//! Reduction of a result set into one verdict.
//!
//! Overall health is the logical AND of every probe's health: a single
//! unhealthy probe makes the whole system unhealthy. There is no weighting
//! and no quorum. An empty probe set is healthy (vacuous truth); this is the
//! documented policy for a config with no `[[checks]]`.

use chrono::{DateTime, Utc};

use super::results::{AggregateSnapshot, ResultSet};

pub fn overall_health(results: &ResultSet) -> bool {
    results.iter().all(|r| r.healthy)
}

pub fn aggregate(
    results: ResultSet,
    cycle: u64,
    started_at: DateTime<Utc>,
    generated_at: DateTime<Utc>,
) -> AggregateSnapshot {
    AggregateSnapshot {
        overall_healthy: overall_health(&results),
        cycle,
        started_at,
        generated_at,
        results,
    }
}
