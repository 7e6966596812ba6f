//! Configuration validation.
//!
//! Serde handles syntax; this checks server-level value ranges. Per-probe
//! fields are validated when each entry is turned into a probe (see
//! [`crate::probe::ProbeSpec::from_config`]), and those errors are collected
//! here as well so a single run reports everything wrong with the file.

use std::net::SocketAddr;

use crate::config::schema::RuntimeConfig;
use crate::error::ConfigurationError;
use crate::probe::ProbeSpec;

/// Check that `code` is usable as a response status.
pub fn validate_status_code(field: &str, code: u16) -> Result<(), ConfigurationError> {
    if (100..=599).contains(&code) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidStatusCode {
            field: field.to_string(),
            code,
        })
    }
}

/// Validate the whole configuration, returning all errors found.
pub fn validate_config(config: &RuntimeConfig) -> Result<(), Vec<ConfigurationError>> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push(ConfigurationError::EmptyHost);
    }
    if config.period.is_zero() {
        errors.push(ConfigurationError::InvalidPeriod(config.period));
    }
    if let Err(e) = validate_status_code("ok_status", config.ok_status) {
        errors.push(e);
    }
    if let Err(e) = validate_status_code("nok_status", config.nok_status) {
        errors.push(e);
    }
    if let Some(addr) = &config.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ConfigurationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    for (index, check) in config.checks.iter().enumerate() {
        if let Err(e) = ProbeSpec::from_config(index, check) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
