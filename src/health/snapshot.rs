//! Latest-snapshot slot shared between the scheduler and the status server.
//!
//! One writer ([`SnapshotPublisher`], owned by the scheduler) and any number
//! of readers ([`SnapshotReader`]). Publishing is a single atomic pointer
//! swap; readers get a whole `Arc<AggregateSnapshot>` or nothing, never a
//! partially written value, and never hold a lock.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::engine::AggregateSnapshot;

/// Create an empty slot and its write and read handles.
pub fn slot() -> (SnapshotPublisher, SnapshotReader) {
    let inner = Arc::new(ArcSwapOption::empty());
    (
        SnapshotPublisher {
            inner: Arc::clone(&inner),
        },
        SnapshotReader { inner },
    )
}

/// Sole write handle. Deliberately not `Clone`.
pub struct SnapshotPublisher {
    inner: Arc<ArcSwapOption<AggregateSnapshot>>,
}

impl SnapshotPublisher {
    /// Replace the current snapshot. The previous one is discarded.
    pub fn publish(&self, snapshot: AggregateSnapshot) {
        self.inner.store(Some(Arc::new(snapshot)));
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only handle to the latest snapshot.
#[derive(Clone)]
pub struct SnapshotReader {
    inner: Arc<ArcSwapOption<AggregateSnapshot>>,
}

impl SnapshotReader {
    /// `None` until the first cycle has been published.
    pub fn latest(&self) -> Option<Arc<AggregateSnapshot>> {
        self.inner.load_full()
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("cycle", &self.latest().map(|s| s.cycle))
            .finish()
    }
}
