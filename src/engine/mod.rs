//! Probe execution and aggregation.
//!
//! # Data Flow
//! ```text
//! Engine::run_cycle
//!     → one task per probe (own timeout, shared cancel token)
//!     → reports fan in over a channel sized to the probe count
//!     → slots filled by configured index (not completion order)
//!     → CycleReport::Completed(ResultSet) | CycleReport::Cancelled
//!
//! aggregate(ResultSet) → AggregateSnapshot (logical AND)
//! ```

pub mod aggregate;
pub mod executor;
pub mod results;

pub use aggregate::{aggregate, overall_health};
pub use executor::{CycleReport, Engine};
pub use results::{AggregateSnapshot, ProbeResult, ResultSet};
