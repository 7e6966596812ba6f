//! Periodic health evaluation.
//!
//! # Data Flow
//! ```text
//! scheduler.rs:
//!     Periodic timer
//!     → Engine::run_cycle
//!     → aggregate
//!     → snapshot.rs (atomic replace)
//!
//! snapshot.rs:
//!     SnapshotPublisher (scheduler, sole writer)
//!     SnapshotReader    (status server, lock-free reads)
//! ```

pub mod scheduler;
pub mod snapshot;

pub use scheduler::{Scheduler, SchedulerState};
pub use snapshot::{SnapshotPublisher, SnapshotReader};
