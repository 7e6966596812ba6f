//! One-shot runner output and exit status.

#![cfg(unix)]

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use probewatch::config::CheckConfig;
use probewatch::engine::ResultSet;
use probewatch::oneshot::{self, ExitStatus};

mod common;

#[tokio::test]
async fn test_all_healthy_exits_zero() {
    let engine = common::engine(&[
        CheckConfig::shell("exit 0", Duration::from_secs(1)),
        CheckConfig::command("true", Duration::from_secs(1)),
    ]);
    let mut out = Vec::new();

    let status = oneshot::run(&engine, &CancellationToken::new(), &mut out).await;
    assert_eq!(status, ExitStatus::Healthy);

    let results: ResultSet = serde_json::from_slice(&out).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.healthy));
}

#[tokio::test]
async fn test_any_unhealthy_exits_one() {
    let backend = common::start_status_backend(503).await;
    let engine = common::engine(&[
        CheckConfig::shell("exit 0", Duration::from_secs(1)),
        CheckConfig::network(format!("http://{backend}/"), &[200], Duration::from_secs(2)),
    ]);
    let mut out = Vec::new();

    let status = oneshot::run(&engine, &CancellationToken::new(), &mut out).await;
    assert_eq!(status, ExitStatus::Unhealthy);
    assert_eq!(status.code(), 1);

    let results: ResultSet = serde_json::from_slice(&out).unwrap();
    let health: Vec<bool> = results.iter().map(|r| r.healthy).collect();
    assert_eq!(health, vec![true, false]);
}

#[tokio::test]
async fn test_interrupted_run_prints_nothing() {
    let engine = common::engine(&[CheckConfig::shell("sleep 10", Duration::from_secs(30))]);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let mut out = Vec::new();
    let status = oneshot::run(&engine, &cancel, &mut out).await;
    assert_eq!(status, ExitStatus::Interrupted);
    assert!(out.is_empty());
}
