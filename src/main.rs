//! probewatch: periodic health probes behind a single status endpoint.
//!
//! Server mode runs the probe set every `period` and serves the aggregate
//! verdict on `GET /`. One-shot mode (`--one-shot`) runs it once, prints the
//! results as JSON and exits with 0 (healthy), 1 (unhealthy), 2 (fatal) or
//! 3 (interrupted).

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use probewatch::lifecycle::{signals, startup, Shutdown};
use probewatch::observability::logging;
use probewatch::oneshot::{self, ExitStatus};

#[derive(Parser, Debug)]
#[command(name = "probewatch", version)]
#[command(about = "Run health probes and expose their aggregate status", long_about = None)]
struct Cli {
    /// Run in debug mode.
    #[arg(short, long, env = "PROBEWATCH_DEBUG")]
    debug: bool,

    /// Do not run forever, execute the probes only once.
    #[arg(short, long)]
    one_shot: bool,

    /// Path to the TOML config.
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let (config, engine) = match startup::prepare(&cli.config) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "Cannot start");
            return ExitStatus::Fatal.into();
        }
    };

    let shutdown = Shutdown::new();
    let listener = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signals::listen(listener).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    });

    if cli.one_shot {
        let mut stdout = std::io::stdout();
        return oneshot::run(&engine, &shutdown.token(), &mut stdout).await.into();
    }

    tracing::info!("probewatch v{} starting", env!("CARGO_PKG_VERSION"));
    match startup::serve(config, engine, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitStatus::Fatal.into()
        }
    }
}
