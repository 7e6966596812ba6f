//! Error types shared across the crate.
//!
//! Probe-level faults are not here: they never escape the engine and live in
//! [`crate::probe::ProbeFault`], where they are turned into unhealthy outcomes.

use std::time::Duration;
use thiserror::Error;

use crate::config::loader::ConfigError;

/// A configuration problem detected before any cycle runs.
///
/// Always fatal. Raised while validating the config file and while turning
/// `[[checks]]` entries into probes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{probe}: missing required field `{field}`")]
    MissingField { probe: String, field: &'static str },

    #[error("{probe}: timeout must be greater than zero")]
    NonPositiveTimeout { probe: String },

    #[error("{probe}: command line is empty")]
    EmptyCommand { probe: String },

    #[error("{probe}: cannot split command line `{command}` (unbalanced quotes?)")]
    InvalidCommandLine { probe: String, command: String },

    #[error("{probe}: invalid url `{url}`: {reason}")]
    InvalidUrl { probe: String, url: String, reason: String },

    #[error("{probe}: acceptable status code set is empty")]
    EmptyStatusCodes { probe: String },

    #[error("{field}: {code} is not a valid HTTP status code")]
    InvalidStatusCode { field: String, code: u16 },

    #[error("{probe}: cannot build http client: {reason}")]
    HttpClient { probe: String, reason: String },

    #[error("period must be greater than zero (got {0:?})")]
    InvalidPeriod(Duration),

    #[error("host must not be empty")]
    EmptyHost,

    #[error("metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Top-level error reported by the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
