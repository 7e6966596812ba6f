//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: probe construction, status codes and the bind are all
//!   checked before any cycle runs
//! - The listener is bound before the scheduler starts
//! - Scheduler and server share one shutdown coordinator

use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;

use crate::config::{load_config, RuntimeConfig};
use crate::engine::Engine;
use crate::error::{ConfigurationError, Result};
use crate::health::Scheduler;
use crate::http::StatusServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::probe::build_probes;

/// Log the effective configuration, one event per check.
pub fn log_config(config: &RuntimeConfig) {
    tracing::info!(
        period = ?config.period,
        host = %config.host,
        port = config.port,
        ok_status = config.ok_status,
        nok_status = config.nok_status,
        "Configuration loaded"
    );
    for (index, check) in config.checks.iter().enumerate() {
        tracing::info!(
            name = %check.display_name(index),
            kind = %check.kind,
            exec = ?check.exec,
            url = ?check.url,
            status_codes = ?check.status_codes,
            timeout = ?check.timeout,
            "Check"
        );
    }
}

/// Turn the configured checks into an engine.
pub fn build_engine(config: &RuntimeConfig) -> std::result::Result<Engine, ConfigurationError> {
    Ok(Engine::new(build_probes(&config.checks)?))
}

/// Load the config file, log it and build the engine.
pub fn prepare(path: &Path) -> Result<(RuntimeConfig, Engine)> {
    let config = load_config(path)?;
    log_config(&config);
    let engine = build_engine(&config)?;
    Ok((config, engine))
}

/// Run the scheduler and the status server until shutdown completes.
pub async fn serve(config: RuntimeConfig, engine: Engine, shutdown: Shutdown) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve_on(listener, config, engine, shutdown).await
}

/// Like [`serve`], on an already bound listener.
pub async fn serve_on(listener: TcpListener, config: RuntimeConfig, engine: Engine, shutdown: Shutdown) -> Result<()> {
    let scheduler = Scheduler::new(engine, config.period);
    let server = StatusServer::new(&config, scheduler.reader())?;

    if let Some(addr) = &config.metrics_address {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(metrics_address = %addr, "Failed to parse metrics address"),
        }
    }

    let scheduler_task = tokio::spawn(scheduler.run(shutdown.clone()));

    let served = server.run(listener, shutdown.token()).await;
    if served.is_err() {
        // The server died on its own; take the scheduler down with it.
        shutdown.trigger();
    }

    if let Err(e) = scheduler_task.await {
        tracing::error!(error = %e, "Scheduler task failed");
    }

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
