//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Durations are written in humantime notation (`"10s"`, `"250ms"`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration handed to the core.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Host the status server binds to.
    pub host: String,

    /// Port the status server binds to.
    pub port: u16,

    /// Time between the starts of two consecutive cycles.
    #[serde(with = "humantime_serde")]
    pub period: Duration,

    /// Status code served while every probe is healthy.
    pub ok_status: u16,

    /// Status code served while any probe is unhealthy, or before the first
    /// cycle completes.
    pub nok_status: u16,

    /// How long in-flight responses may take once shutdown begins.
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,

    /// Prometheus listener address (e.g. "127.0.0.1:9090"). Disabled if unset.
    pub metrics_address: Option<String>,

    /// Probe definitions, in evaluation and reporting order.
    pub checks: Vec<CheckConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            period: Duration::from_secs(10),
            ok_status: 200,
            nok_status: 503,
            shutdown_grace: Duration::from_secs(5),
            metrics_address: None,
            checks: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Probe kind selector, the `type` key of a `[[checks]]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Command line run through the system shell.
    Shell,
    /// Executable plus arguments, run without a shell.
    Command,
    /// HTTP GET against a URL.
    Network,
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::Shell => f.write_str("shell"),
            ProbeKind::Command => f.write_str("command"),
            ProbeKind::Network => f.write_str("network"),
        }
    }
}

/// One `[[checks]]` entry.
///
/// Kind-specific fields are optional at this level; their presence is
/// enforced when the entry is turned into a probe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Display name. Derived from kind and target when absent.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: ProbeKind,

    /// Per-probe deadline.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Command line for `shell` and `command` probes.
    #[serde(default)]
    pub exec: Option<String>,

    /// Target URL for `network` probes.
    #[serde(default)]
    pub url: Option<String>,

    /// Acceptable response codes for `network` probes. Defaults to `[200]`.
    #[serde(default)]
    pub status_codes: Option<Vec<u16>>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

impl CheckConfig {
    /// A bare entry of the given kind with default timeout.
    pub fn new(kind: ProbeKind) -> Self {
        Self {
            name: None,
            kind,
            timeout: default_timeout(),
            exec: None,
            url: None,
            status_codes: None,
        }
    }

    /// Shell probe entry.
    pub fn shell(exec: impl Into<String>, timeout: Duration) -> Self {
        Self {
            exec: Some(exec.into()),
            timeout,
            ..Self::new(ProbeKind::Shell)
        }
    }

    /// Command probe entry.
    pub fn command(exec: impl Into<String>, timeout: Duration) -> Self {
        Self {
            exec: Some(exec.into()),
            timeout,
            ..Self::new(ProbeKind::Command)
        }
    }

    /// Network probe entry.
    pub fn network(url: impl Into<String>, status_codes: &[u16], timeout: Duration) -> Self {
        Self {
            url: Some(url.into()),
            status_codes: Some(status_codes.to_vec()),
            timeout,
            ..Self::new(ProbeKind::Network)
        }
    }

    /// Name used in logs, errors and results.
    pub fn display_name(&self, index: usize) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (self.kind, &self.exec, &self.url) {
            (ProbeKind::Shell | ProbeKind::Command, Some(exec), _) => format!("{}: {}", self.kind, exec),
            (ProbeKind::Network, _, Some(url)) => format!("{}: {}", self.kind, url),
            _ => format!("{}#{}", self.kind, index),
        }
    }
}
