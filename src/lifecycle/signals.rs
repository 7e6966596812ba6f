//! OS signal handling.
//!
//! SIGINT, SIGTERM and SIGQUIT (Ctrl-C elsewhere) trigger shutdown. The first
//! one is graceful; a second one forces in-flight probes to be cancelled.

use crate::lifecycle::shutdown::{Shutdown, ShutdownStage};

/// Listen for termination signals until shutdown has been forced.
#[cfg(unix)]
pub async fn listen(shutdown: Shutdown) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    loop {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
            _ = sigquit.recv() => "SIGQUIT",
        };
        if escalate(&shutdown, name) == ShutdownStage::Forced {
            return Ok(());
        }
    }
}

#[cfg(not(unix))]
pub async fn listen(shutdown: Shutdown) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        if escalate(&shutdown, "ctrl-c") == ShutdownStage::Forced {
            return Ok(());
        }
    }
}

fn escalate(shutdown: &Shutdown, signal: &str) -> ShutdownStage {
    let stage = shutdown.trigger();
    match stage {
        ShutdownStage::Graceful => {
            tracing::info!(signal, "Caught exit signal, shutting down gracefully")
        }
        ShutdownStage::Forced => {
            tracing::warn!(signal, "Caught second exit signal, cancelling in-flight probes")
        }
    }
    stage
}
