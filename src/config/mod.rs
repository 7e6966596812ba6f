//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every error collected)
//!     → RuntimeConfig (validated, immutable)
//!     → lifecycle::startup builds probes from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the probe set is never reloaded
//! - All server fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CheckConfig, ProbeKind, RuntimeConfig};
