// ABOUTME: Integration tests for the convergence poller's retry schedule.
// ABOUTME: Uses scripted container statuses and a recording clock instead of real sleeps.

mod support;

use std::time::Duration;
use support::fakes::{FakeContainers, RecordingClock};
use vnet::config::WaitPolicy;
use vnet::lifecycle::{WaitError, await_status};
use vnet::runtime::{ContainerError, ContainerOps};

fn policy(max_attempts: u32) -> WaitPolicy {
    WaitPolicy {
        max_attempts,
        interval: Duration::from_secs(1),
        backoff_multiplier: 1,
    }
}

#[tokio::test]
async fn converges_on_third_probe() {
    support::init_tracing();
    let containers = FakeContainers::new().with_container("m1", "Stopped");
    containers.script_status("m1", &["Stopped", "Stopped", "Running"]);
    let clock = RecordingClock::new();

    let attempts = await_status(
        || containers.container_status("m1"),
        "Running",
        &policy(3),
        &clock,
    )
    .await
    .unwrap();

    assert_eq!(attempts, 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn times_out_without_trailing_sleep() {
    let containers = FakeContainers::new().with_container("m1", "Stopped");
    let clock = RecordingClock::new();

    let result = await_status(
        || containers.container_status("m1"),
        "Running",
        &policy(3),
        &clock,
    )
    .await;

    assert!(matches!(
        result,
        Err(WaitError::Timeout { ref target, attempts: 3 }) if target == "Running"
    ));
    assert_eq!(clock.sleeps().len(), 2);
    assert_eq!(clock.total(), Duration::from_secs(3));
    assert_eq!(
        containers.calls().iter().filter(|c| *c == "status m1").count(),
        3
    );
}

#[tokio::test]
async fn multiplier_scales_each_wait() {
    let containers = FakeContainers::new().with_container("m1", "Stopped");
    let clock = RecordingClock::new();
    let policy = WaitPolicy {
        max_attempts: 4,
        interval: Duration::from_millis(500),
        backoff_multiplier: 2,
    };

    let result = await_status(
        || containers.container_status("m1"),
        "Running",
        &policy,
        &clock,
    )
    .await;

    assert!(matches!(result, Err(WaitError::Timeout { attempts: 4, .. })));
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(3),
        ]
    );
}

#[tokio::test]
async fn status_comparison_ignores_case() {
    let containers = FakeContainers::new().with_container("m1", "STOPPED");
    let clock = RecordingClock::new();

    let attempts = await_status(
        || containers.container_status("m1"),
        "Stopped",
        &policy(3),
        &clock,
    )
    .await
    .unwrap();

    assert_eq!(attempts, 1);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn missing_container_surfaces_probe_error() {
    let containers = FakeContainers::new();
    let clock = RecordingClock::new();

    let result = await_status(
        || containers.container_status("ghost"),
        "Running",
        &policy(3),
        &clock,
    )
    .await;

    assert!(matches!(
        result,
        Err(WaitError::Probe(ContainerError::NotFound(ref name))) if name == "ghost"
    ));
    assert!(clock.sleeps().is_empty());
}
