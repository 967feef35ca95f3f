// crates/openapi-conformance-core/tests/waiter.rs
// ============================================================================
// Module: Publication Waiter Tests
// Description: Deterministic timing checks for the poll loop.
// ============================================================================
//! ## Overview
//! Runs the waiter on a paused tokio clock to verify eventual publication,
//! deadline handling, transport short-circuiting, and cancellation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::time::Duration;

use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::Verdict;
use openapi_conformance_core::runtime::PollPolicy;
use openapi_conformance_core::runtime::PollPolicyError;
use openapi_conformance_core::runtime::PublicationWaiter;
use openapi_conformance_core::runtime::WaitError;
use openapi_conformance_core::runtime::cancel_pair;
use tokio::time::Instant;

use crate::common::SimulatedSource;
use crate::common::sample_document;

fn policy(interval_ms: u64, deadline_ms: u64) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(interval_ms), Duration::from_millis(deadline_ms)).unwrap()
}

fn widgets() -> GroupVersion {
    GroupVersion::new("stable.example.com", "v1")
}

#[tokio::test(start_paused = true)]
async fn publication_after_misses_is_found() {
    let source = SimulatedSource::new();
    let target = widgets();
    source.publish_after(target.clone(), sample_document(&target), 3);
    let waiter = PublicationWaiter::new(policy(100, 5_000));

    let publication = waiter.await_publication(&source, &target).await.unwrap();

    assert_eq!(publication.attempts, 4);
    assert!(publication.elapsed >= Duration::from_millis(300));
    assert!(publication.elapsed <= Duration::from_millis(5_000));
    assert_eq!(publication.document, sample_document(&target));
}

#[tokio::test(start_paused = true)]
async fn immediate_publication_takes_one_attempt() {
    let target = widgets();
    let source = SimulatedSource::with_groups([&target]);
    let waiter = PublicationWaiter::new(policy(100, 1_000));

    let publication = waiter.await_publication(&source, &target).await.unwrap();

    assert_eq!(publication.attempts, 1);
    assert_eq!(publication.elapsed, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn unpublished_target_times_out_at_the_deadline() {
    let source = SimulatedSource::new();
    let waiter = PublicationWaiter::new(policy(300, 1_000));
    let started = Instant::now();

    let err = waiter.await_publication(&source, &widgets()).await.unwrap_err();

    let WaitError::Timeout {
        waited,
        interval,
        attempts,
        ..
    } = err
    else {
        panic!("expected timeout, got {err:?}");
    };
    assert!(waited >= Duration::from_millis(1_000));
    assert!(waited < Duration::from_millis(1_300));
    assert!(started.elapsed() >= Duration::from_millis(1_000));
    assert_eq!(interval, Duration::from_millis(300));
    // Attempts at 0, 300, 600, 900 and a final one clamped to the deadline.
    assert_eq!(attempts, 5);
    assert_eq!(source.fetch_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn fetch_in_flight_at_deadline_is_abandoned() {
    let source = SimulatedSource::new();
    source.delay_fetches(Duration::from_secs(60));
    let waiter = PublicationWaiter::new(policy(100, 1_000));

    let err = waiter.await_publication(&source, &widgets()).await.unwrap_err();

    let WaitError::Timeout {
        waited,
        attempts,
        ..
    } = err
    else {
        panic!("expected timeout, got {err:?}");
    };
    assert_eq!(waited, Duration::from_millis(1_000));
    assert_eq!(attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn transport_error_ends_wait_after_one_attempt() {
    let source = SimulatedSource::new();
    let target = widgets();
    source.fail_fetch(target.clone(), "connection refused");
    let waiter = PublicationWaiter::new(policy(100, 10_000));
    let started = Instant::now();

    let err = waiter.await_publication(&source, &target).await.unwrap_err();

    assert_eq!(
        err,
        WaitError::Transport {
            target,
            attempts: 1,
            cause: "discovery transport error: connection refused".to_string(),
        }
    );
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_wait_within_one_interval() {
    let source = SimulatedSource::new();
    let (handle, signal) = cancel_pair();
    let waiter = PublicationWaiter::new(policy(1_000, 60_000)).with_cancel(signal);
    let started = Instant::now();

    let target = widgets();
    let (outcome, ()) = tokio::join!(waiter.await_publication(&source, &target), async {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        handle.cancel();
    });

    let err = outcome.unwrap_err();
    assert!(matches!(err, WaitError::Cancelled { attempts: 3, .. }), "got {err:?}");
    assert!(started.elapsed() < Duration::from_millis(3_500));
    assert_eq!(err.into_verdict(), None);
}

#[tokio::test(start_paused = true)]
async fn cancelled_signal_prevents_any_attempt() {
    let source = SimulatedSource::new();
    let (handle, signal) = cancel_pair();
    handle.cancel();
    let waiter = PublicationWaiter::new(policy(100, 1_000)).with_cancel(signal);

    let err = waiter.await_publication(&source, &widgets()).await.unwrap_err();

    assert!(matches!(err, WaitError::Cancelled { attempts: 0, .. }));
    assert_eq!(source.fetch_count(), 0);
}

#[test]
fn poll_policy_rejects_invalid_bounds() {
    assert_eq!(
        PollPolicy::new(Duration::ZERO, Duration::from_secs(1)),
        Err(PollPolicyError::ZeroInterval)
    );
    assert_eq!(
        PollPolicy::new(Duration::from_secs(1), Duration::ZERO),
        Err(PollPolicyError::ZeroDeadline)
    );
    assert_eq!(
        PollPolicy::new(Duration::from_secs(2), Duration::from_secs(1)),
        Err(PollPolicyError::IntervalExceedsDeadline {
            interval_ms: 2_000,
            deadline_ms: 1_000,
        })
    );
    let policy = PollPolicy::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
    assert_eq!(policy.interval(), policy.deadline());
}

#[test]
fn wait_errors_map_to_verdicts() {
    let timeout = WaitError::Timeout {
        target: widgets(),
        waited: Duration::from_secs(30),
        interval: Duration::from_secs(1),
        attempts: 31,
    };
    assert_eq!(
        timeout.clone().into_verdict(),
        Some(Verdict::Timeout {
            waited: Duration::from_secs(30),
            interval: Duration::from_secs(1),
            attempts: 31,
        })
    );
    assert!(timeout.to_string().contains("30000 ms"));

    let transport = WaitError::Transport {
        target: widgets(),
        attempts: 1,
        cause: "tls handshake failed".to_string(),
    };
    assert_eq!(
        transport.into_verdict(),
        Some(Verdict::TransportError {
            cause: "tls handshake failed".to_string(),
        })
    );
}
