//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Build probes → Bind listener → Start scheduler + server
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Scheduler stops ticking, in-flight cycle drains
//!             → Server stops accepting, drains within grace period
//!     Second trigger → in-flight probes cancelled
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGQUIT → Shutdown::trigger
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownStage};
