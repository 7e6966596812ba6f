//! Structured logging.
//!
//! Logs go to stderr so one-shot mode can keep stdout for its JSON report.
//! The filter defaults to warnings only; `--debug` raises it, and `RUST_LOG`
//! overrides both.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "probewatch=warn";
const DEBUG_FILTER: &str = "probewatch=debug,tower_http=debug";

pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the global tracing subscriber.
pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
