//! Network probe: a single HTTP GET checked against accepted status codes.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tokio::time;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{Outcome, ProbeFault};
use crate::config::validation::validate_status_code;
use crate::error::ConfigurationError;

const DEFAULT_STATUS_CODES: &[u16] = &[200];

#[derive(Debug, Clone)]
pub struct NetworkProbe {
    url: Url,
    status_codes: BTreeSet<u16>,
    client: reqwest::Client,
}

impl NetworkProbe {
    pub fn new(
        probe: &str,
        url: Option<&str>,
        status_codes: Option<&[u16]>,
    ) -> Result<Self, ConfigurationError> {
        let raw = url.ok_or_else(|| ConfigurationError::MissingField {
            probe: probe.to_string(),
            field: "url",
        })?;
        let invalid = |reason: String| ConfigurationError::InvalidUrl {
            probe: probe.to_string(),
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }

        let codes = status_codes.unwrap_or(DEFAULT_STATUS_CODES);
        if codes.is_empty() {
            return Err(ConfigurationError::EmptyStatusCodes {
                probe: probe.to_string(),
            });
        }
        for &code in codes {
            validate_status_code(&format!("{probe}: status_codes"), code)?;
        }

        // Probes talk to their target directly, whatever the proxy env says.
        let client = reqwest::Client::builder()
            .no_proxy()
            .user_agent(concat!("probewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigurationError::HttpClient {
                probe: probe.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            url,
            status_codes: codes.iter().copied().collect(),
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status_codes(&self) -> &BTreeSet<u16> {
        &self.status_codes
    }

    pub async fn execute(&self, timeout: Duration, cancel: &CancellationToken) -> Outcome {
        let started = Instant::now();
        let request = self.client.get(self.url.clone()).timeout(timeout).send();

        let response = tokio::select! {
            response = request => response,
            _ = time::sleep(timeout) => {
                return Outcome::from_fault(ProbeFault::TimedOut(timeout), started.elapsed());
            }
            _ = cancel.cancelled() => {
                return Outcome::from_fault(ProbeFault::Cancelled, started.elapsed());
            }
        };

        let elapsed = started.elapsed();
        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                if self.status_codes.contains(&status) {
                    Outcome::healthy(format!("HTTP {status}"), elapsed)
                } else {
                    Outcome::unhealthy(
                        format!("HTTP {status} not in accepted set {:?}", self.status_codes),
                        elapsed,
                    )
                }
            }
            Err(e) if e.is_timeout() => Outcome::from_fault(ProbeFault::TimedOut(timeout), elapsed),
            Err(e) => Outcome::from_fault(ProbeFault::Transport(error_chain(&e)), elapsed),
        }
    }
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
