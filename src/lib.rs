//! Periodic health probe runner.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      probewatch                      │
//!                 │                                                      │
//!                 │  ┌───────────┐   ┌──────────┐   ┌────────────────┐   │
//!                 │  │ scheduler │──▶│  engine  │──▶│ probes (shell, │   │
//!                 │  │  (health) │   │ fan-out  │   │ command, net)  │   │
//!                 │  └─────┬─────┘   └────┬─────┘   └────────────────┘   │
//!                 │        │  aggregate   │                              │
//!                 │        ▼              │                              │
//!                 │  ┌───────────┐        │         ┌──────────────┐     │
//!  Supervisor ────┼─▶│  status   │        └────────▶│   one-shot   │─────┼──▶ stdout + exit code
//!   GET /         │  │  server   │                  └──────────────┘     │
//!                 │  └───────────┘                                       │
//!                 │                                                      │
//!                 │  config · lifecycle (startup/shutdown/signals)       │
//!                 │  observability (logging, metrics)                    │
//!                 └──────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod oneshot;
pub mod probe;

pub use config::RuntimeConfig;
pub use engine::{AggregateSnapshot, CycleReport, Engine, ResultSet};
pub use error::{ConfigurationError, Error};
pub use health::Scheduler;
pub use http::StatusServer;
pub use lifecycle::Shutdown;
