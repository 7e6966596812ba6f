//! End-to-end cycles through the execution engine.

#![cfg(unix)]

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use probewatch::config::{CheckConfig, ProbeKind};
use probewatch::engine::{aggregate, CycleReport, ResultSet};

mod common;

async fn complete(checks: &[CheckConfig]) -> ResultSet {
    match common::engine(checks).run_cycle(&CancellationToken::new()).await {
        CycleReport::Completed(results) => results,
        CycleReport::Cancelled => panic!("cycle was not expected to be cancelled"),
    }
}

#[tokio::test]
async fn test_mixed_probe_scenario() {
    let backend = common::start_status_backend(500).await;

    let results = complete(&[
        CheckConfig::shell("exit 0", Duration::from_secs(1)),
        CheckConfig::command("/nonexistent/probe-binary", Duration::from_secs(1)),
        CheckConfig::network(format!("http://{backend}/"), &[200], Duration::from_secs(2)),
    ])
    .await;

    assert_eq!(results.len(), 3);
    let entries = results.entries();

    assert_eq!(entries[0].kind, ProbeKind::Shell);
    assert!(entries[0].healthy, "{}", entries[0].detail);

    assert_eq!(entries[1].kind, ProbeKind::Command);
    assert!(!entries[1].healthy);
    assert!(entries[1].detail.contains("not found"), "{}", entries[1].detail);

    assert_eq!(entries[2].kind, ProbeKind::Network);
    assert!(!entries[2].healthy);
    assert!(entries[2].detail.contains("500"), "{}", entries[2].detail);

    let now = chrono::Utc::now();
    assert!(!aggregate(results, 1, now, now).overall_healthy);
}

#[tokio::test]
async fn test_network_probe_accepts_any_listed_code() {
    let backend = common::start_status_backend(204).await;

    let results = complete(&[CheckConfig::network(
        format!("http://{backend}/health"),
        &[200, 204],
        Duration::from_secs(2),
    )])
    .await;

    assert!(results.entries()[0].healthy, "{}", results.entries()[0].detail);
    assert_eq!(results.entries()[0].detail, "HTTP 204");
}

#[tokio::test]
async fn test_results_follow_configuration_order() {
    // The first probe finishes last.
    let mut checks = vec![CheckConfig::shell("sleep 0.4; exit 0", Duration::from_secs(3))];
    for i in 0..7 {
        let mut check = CheckConfig::shell(format!("exit {}", i % 2), Duration::from_secs(3));
        check.name = Some(format!("probe-{i}"));
        checks.push(check);
    }

    let results = complete(&checks).await;

    assert_eq!(results.len(), checks.len());
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names[0], "shell: sleep 0.4; exit 0");
    for (i, name) in names[1..].iter().enumerate() {
        assert_eq!(*name, format!("probe-{i}"));
        assert_eq!(results.entries()[i + 1].healthy, i % 2 == 0);
    }
}

#[tokio::test]
async fn test_timeout_is_bounded_and_isolated() {
    let started = Instant::now();
    let results = complete(&[
        CheckConfig::shell("sleep 10", Duration::from_millis(300)),
        CheckConfig::shell("exit 0", Duration::from_secs(2)),
    ])
    .await;

    assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
    assert!(!results.entries()[0].healthy);
    assert!(results.entries()[0].detail.contains("timed out"), "{}", results.entries()[0].detail);
    assert!(results.entries()[1].healthy);
}

#[tokio::test]
async fn test_slow_network_endpoint_times_out() {
    let backend = common::start_backend(200, Duration::from_secs(5)).await;

    let started = Instant::now();
    let results = complete(&[CheckConfig::network(
        format!("http://{backend}/"),
        &[200],
        Duration::from_millis(300),
    )])
    .await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!results.entries()[0].healthy);
    assert!(results.entries()[0].detail.contains("timed out"), "{}", results.entries()[0].detail);
}

#[tokio::test]
async fn test_cancellation_yields_no_partial_results() {
    let engine = common::engine(&[
        CheckConfig::shell("exit 0", Duration::from_secs(1)),
        CheckConfig::shell("sleep 10", Duration::from_secs(30)),
    ]);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    assert_eq!(engine.run_cycle(&cancel).await, CycleReport::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_repeated_cycles_are_comparable() {
    let engine = common::engine(&[
        CheckConfig::shell("exit 0", Duration::from_secs(1)),
        CheckConfig::shell("exit 1", Duration::from_secs(1)),
    ]);

    let mut runs = Vec::new();
    for _ in 0..2 {
        match engine.run_cycle(&CancellationToken::new()).await {
            CycleReport::Completed(results) => runs.push(
                results
                    .iter()
                    .map(|r| (r.name.clone(), r.healthy, r.detail.clone()))
                    .collect::<Vec<_>>(),
            ),
            CycleReport::Cancelled => panic!("unexpected cancellation"),
        }
    }
    assert_eq!(runs[0], runs[1]);
}
