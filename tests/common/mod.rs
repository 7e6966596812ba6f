//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use probewatch::config::CheckConfig;
use probewatch::engine::Engine;
use probewatch::probe::build_probes;

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Start a mock backend answering every request with `status` after `delay`.
///
/// Binds an ephemeral port and returns its address.
pub async fn start_backend(status: u16, delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;

                let response = if status == 204 {
                    format!("HTTP/1.1 204 {}\r\nConnection: close\r\n\r\n", reason(status))
                } else {
                    format!(
                        "HTTP/1.1 {} {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                        status,
                        reason(status)
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock backend answering immediately with `status`.
pub async fn start_status_backend(status: u16) -> SocketAddr {
    start_backend(status, Duration::ZERO).await
}

/// Build an engine from check entries, panicking on bad config.
pub fn engine(checks: &[CheckConfig]) -> Engine {
    Engine::new(build_probes(checks).unwrap())
}

/// Reserve an ephemeral port on localhost.
pub async fn bind_local() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}
