//! Metrics collection and exposition.
//!
//! # Metrics
//! - `probewatch_probe_healthy` (gauge): 1=healthy, 0=unhealthy, per probe
//! - `probewatch_probe_duration_seconds` (histogram): per probe
//! - `probewatch_cycles_total` (counter): completed cycles by result
//! - `probewatch_cycle_duration_seconds` (histogram)
//! - `probewatch_overall_healthy` (gauge)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(name: &str, healthy: bool, elapsed: Duration) {
    ::metrics::gauge!("probewatch_probe_healthy", "probe" => name.to_string()).set(as_gauge(healthy));
    ::metrics::histogram!("probewatch_probe_duration_seconds", "probe" => name.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_cycle(healthy: bool, elapsed: Duration) {
    let result = if healthy { "healthy" } else { "unhealthy" };
    ::metrics::counter!("probewatch_cycles_total", "result" => result).increment(1);
    ::metrics::histogram!("probewatch_cycle_duration_seconds").record(elapsed.as_secs_f64());
    ::metrics::gauge!("probewatch_overall_healthy").set(as_gauge(healthy));
}

fn as_gauge(healthy: bool) -> f64 {
    if healthy {
        1.0
    } else {
        0.0
    }
}
