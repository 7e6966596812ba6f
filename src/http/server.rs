//! Status server.
//!
//! # Responsibilities
//! - Serve the latest snapshot on `GET /`
//! - Pick the configured healthy/unhealthy status code
//! - Wire up middleware (tracing, timeout, request ID)
//! - Graceful shutdown bounded by a grace period

use axum::{extract::State, response::Response, routing::get, Router};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RuntimeConfig;
use crate::error::ConfigurationError;
use crate::health::SnapshotReader;
use crate::http::response::{self, StatusCodes};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub snapshots: SnapshotReader,
    pub codes: StatusCodes,
}

/// HTTP server exposing the aggregate status.
pub struct StatusServer {
    router: Router,
    grace: Duration,
}

impl StatusServer {
    /// Create a new status server reading from `snapshots`.
    pub fn new(config: &RuntimeConfig, snapshots: SnapshotReader) -> Result<Self, ConfigurationError> {
        let codes = StatusCodes::from_config(config.ok_status, config.nok_status)?;
        let state = AppState { snapshots, codes };
        Ok(Self {
            router: Self::build_router(state),
            grace: config.shutdown_grace,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(status_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, then drain for at most the grace period.
    ///
    /// The listening socket is released when this returns.
    pub async fn run(self, listener: TcpListener, shutdown: CancellationToken) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Status server starting");

        let signal = shutdown.clone();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                signal.cancelled().await;
                tracing::info!("Status server draining connections");
            })
            .into_future();
        tokio::pin!(serve);

        let grace = self.grace;
        let grace_elapsed = async {
            shutdown.cancelled().await;
            time::sleep(grace).await;
        };

        tokio::select! {
            result = &mut serve => result?,
            _ = grace_elapsed => {
                tracing::warn!(grace = ?grace, "Grace period elapsed, dropping open connections");
            }
        }

        tracing::info!("Status server stopped");
        Ok(())
    }
}

async fn status_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshots.latest();
    response::render(snapshot.as_deref(), &state.codes)
}
