//! Scheduler cadence and shutdown behaviour.

#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use probewatch::config::CheckConfig;
use probewatch::engine::AggregateSnapshot;
use probewatch::health::{Scheduler, SchedulerState};
use probewatch::lifecycle::Shutdown;

mod common;

#[tokio::test]
async fn test_first_cycle_runs_immediately() {
    let engine = common::engine(&[CheckConfig::shell("exit 0", Duration::from_secs(1))]);
    let scheduler = Scheduler::new(engine, Duration::from_secs(3600));
    let reader = scheduler.reader();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let started = Instant::now();
    while reader.latest().is_none() {
        assert!(started.elapsed() < Duration::from_secs(3), "first cycle never published");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let snapshot = reader.latest().unwrap();
    assert_eq!(snapshot.cycle, 1);
    assert!(snapshot.overall_healthy);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cycles_never_overlap() {
    // Each cycle takes longer than the period.
    let engine = common::engine(&[CheckConfig::shell("sleep 0.15", Duration::from_secs(2))]);
    let scheduler = Scheduler::new(engine, Duration::from_millis(50));
    let reader = scheduler.reader();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let mut seen: Vec<Arc<AggregateSnapshot>> = Vec::new();
    let started = Instant::now();
    while seen.len() < 4 && started.elapsed() < Duration::from_secs(5) {
        if let Some(snapshot) = reader.latest() {
            if seen.last().map_or(true, |last| last.cycle != snapshot.cycle) {
                seen.push(snapshot);
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();

    assert!(seen.len() >= 3, "only {} cycles observed", seen.len());
    for pair in seen.windows(2) {
        assert!(pair[1].cycle > pair[0].cycle);
        assert!(
            pair[1].started_at >= pair[0].generated_at,
            "cycle {} started before cycle {} finished",
            pair[1].cycle,
            pair[0].cycle
        );
    }
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_cycle() {
    let engine = common::engine(&[CheckConfig::shell("sleep 0.6", Duration::from_secs(5))]);
    let scheduler = Scheduler::new(engine, Duration::from_millis(50));
    let reader = scheduler.reader();
    let mut state = scheduler.state();
    let shutdown = Shutdown::new();

    let started = Instant::now();
    let handle = tokio::spawn(scheduler.run(shutdown.clone()));

    state.wait_for(|s| *s == SchedulerState::RunningCycle).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    // The scheduler waited for the probe rather than abandoning it.
    assert!(started.elapsed() >= Duration::from_millis(500), "exited after {:?}", started.elapsed());
    assert_eq!(*state.borrow(), SchedulerState::Stopped);

    let snapshot = reader.latest().expect("drained cycle should be published");
    assert_eq!(snapshot.cycle, 1, "no new cycle may start after shutdown");
    assert!(snapshot.overall_healthy);
}

#[tokio::test]
async fn test_forced_shutdown_discards_in_flight_cycle() {
    let engine = common::engine(&[CheckConfig::shell("sleep 10", Duration::from_secs(30))]);
    let scheduler = Scheduler::new(engine, Duration::from_millis(50));
    let reader = scheduler.reader();
    let mut state = scheduler.state();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(scheduler.run(shutdown.clone()));

    state.wait_for(|s| *s == SchedulerState::RunningCycle).await.unwrap();
    shutdown.trigger();
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(3), handle).await.unwrap().unwrap();
    assert!(reader.latest().is_none(), "cancelled cycle must not be published");
}
