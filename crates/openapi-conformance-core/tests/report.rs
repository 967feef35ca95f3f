// crates/openapi-conformance-core/tests/report.rs
// ============================================================================
// Module: Snapshot and Report Tests
// Description: Discovery snapshots and run report aggregation.
// ============================================================================
//! ## Overview
//! Validates snapshot filtering and error handling, and that reports are
//! deterministic, correctly summarized, and actionable when rendered.

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

use openapi_conformance_core::DiffEntry;
use openapi_conformance_core::DiffKind;
use openapi_conformance_core::DiscoveryError;
use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::ProvisionError;
use openapi_conformance_core::RoundTripDiff;
use openapi_conformance_core::Verdict;
use openapi_conformance_core::runtime::ConformanceReport;
use openapi_conformance_core::runtime::GroupFilter;
use openapi_conformance_core::runtime::GroupVersionVerdict;
use openapi_conformance_core::runtime::RunStatus;
use openapi_conformance_core::runtime::ScenarioError;
use openapi_conformance_core::runtime::ScenarioKind;
use openapi_conformance_core::runtime::ScenarioReport;
use openapi_conformance_core::runtime::collect_snapshot;
use serde_json::Value;
use serde_json::json;

use crate::common::SimulatedSource;
use crate::common::sample_document;

// ============================================================================
// SECTION: Snapshot
// ============================================================================

#[tokio::test]
async fn snapshot_collects_filtered_documents() {
    let apps = GroupVersion::new("apps", "v1");
    let core = GroupVersion::core("v1");
    let other = GroupVersion::new("other.org", "v1");
    let source = SimulatedSource::with_groups([&apps, &core, &other]);
    let filter = GroupFilter::new(["", "apps"], Vec::<String>::new());

    let snapshot = collect_snapshot(&source, Some(&filter)).await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(&apps), Some(&sample_document(&apps)));
    assert!(snapshot.get(&core).is_some());
    assert!(snapshot.get(&other).is_none());

    let everything = collect_snapshot(&source, None).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn snapshot_skips_withdrawn_and_propagates_transport_errors() {
    let apps = GroupVersion::new("apps", "v1");
    let source = SimulatedSource::with_groups([&apps]);
    source.list_phantom(GroupVersion::new("batch", "v1"));

    let snapshot = collect_snapshot(&source, None).await.unwrap();
    assert_eq!(snapshot.len(), 1);

    source.fail_fetch(GroupVersion::new("policy", "v1"), "EOF");
    let err = collect_snapshot(&source, None).await.unwrap_err();
    assert_eq!(err, DiscoveryError::Transport("EOF".to_string()));
}

// ============================================================================
// SECTION: Report
// ============================================================================

fn passing(name: &str) -> ScenarioReport {
    ScenarioReport {
        name: name.to_string(),
        kind: ScenarioKind::Builtin,
        results: vec![GroupVersionVerdict {
            group_version: GroupVersion::new("apps", "v1"),
            verdict: Verdict::Pass,
        }],
        cleanup_error: None,
    }
}

fn failing(name: &str) -> ScenarioReport {
    ScenarioReport {
        name: name.to_string(),
        kind: ScenarioKind::DynamicType,
        results: vec![GroupVersionVerdict {
            group_version: GroupVersion::new("stable.example.com", "v1"),
            verdict: Verdict::RoundTripMismatch {
                diff: RoundTripDiff {
                    entries: vec![DiffEntry {
                        path: "/webhooks".to_string(),
                        kind: DiffKind::Missing,
                        expected: Some(json!({})),
                        actual: None,
                    }],
                    omitted: 0,
                },
            },
        }],
        cleanup_error: None,
    }
}

#[test]
fn report_orders_scenarios_by_name() {
    let forward = ConformanceReport::from_outcomes("openapi_v3", [Ok(passing("b")), Ok(passing("a"))]);
    let reverse = ConformanceReport::from_outcomes("openapi_v3", [Ok(passing("a")), Ok(passing("b"))]);

    assert_eq!(forward, reverse);
    assert_eq!(forward.to_canonical_json().unwrap(), reverse.to_canonical_json().unwrap());
    assert_eq!(forward.status, RunStatus::Pass);
    assert_eq!(forward.summary.scenarios_passed, 2);
}

#[test]
fn failing_verdict_sets_fail_status() {
    let report =
        ConformanceReport::from_outcomes("openapi_v3", [Ok(passing("builtin")), Ok(failing("crd"))]);

    assert_eq!(report.status, RunStatus::Fail);
    assert_eq!(report.summary.checks, 2);
    assert_eq!(report.summary.checks_failed, 1);

    let json: Value = serde_json::from_slice(&report.to_canonical_json().unwrap()).unwrap();
    assert_eq!(json["status"], json!("fail"));
    let verdict = &json["scenarios"][1]["results"][0]["verdict"];
    assert_eq!(verdict["kind"], json!("round_trip_mismatch"));
    assert_eq!(verdict["diff"]["entries"][0]["path"], json!("/webhooks"));
    assert_eq!(json["scenarios"][1]["results"][0]["group_version"]["group"], json!("stable.example.com"));
}

#[test]
fn scenario_errors_outrank_failures() {
    let error = ScenarioError::Provisioning {
        scenario: "aggregated".to_string(),
        source: ProvisionError::Register("apiservice unavailable".to_string()),
        cleanup_error: Some("unregistration failed: not found".to_string()),
    };
    let report = ConformanceReport::from_outcomes("json", [Ok(failing("crd")), Err(error)]);

    assert_eq!(report.status, RunStatus::Error);
    assert_eq!(report.summary.scenarios_errored, 1);
    assert_eq!(report.errors[0].scenario, "aggregated");
    assert!(report.errors[0].message.contains("apiservice unavailable"));
    assert!(report.errors[0].message.contains("(cleanup: unregistration failed: not found)"));
}

#[test]
fn timeout_verdict_serializes_milliseconds() {
    let report = ConformanceReport::from_outcomes(
        "openapi_v3",
        [Ok(ScenarioReport {
            name: "crd".to_string(),
            kind: ScenarioKind::DynamicType,
            results: vec![GroupVersionVerdict {
                group_version: GroupVersion::new("stable.example.com", "v1"),
                verdict: Verdict::Timeout {
                    waited: Duration::from_millis(30_004),
                    interval: Duration::from_secs(1),
                    attempts: 31,
                },
            }],
            cleanup_error: None,
        })],
    );

    let json: Value = serde_json::from_slice(&report.to_canonical_json().unwrap()).unwrap();
    let verdict = &json["scenarios"][0]["results"][0]["verdict"];
    assert_eq!(verdict, &json!({"kind": "timeout", "waited_ms": 30_004, "interval_ms": 1_000, "attempts": 31}));
}

#[test]
fn markdown_names_group_version_kind_and_payload() {
    let mut cleanup_failed = passing("builtin");
    cleanup_failed.cleanup_error = Some("finalizer stuck".to_string());
    let report =
        ConformanceReport::from_outcomes("openapi_v3", [Ok(failing("crd")), Ok(cleanup_failed)]);

    let markdown = report.to_markdown();

    assert!(markdown.starts_with("# Discovery Conformance Report"));
    assert!(markdown.contains("- Status: fail"));
    assert!(markdown.contains("### crd (dynamic_type): fail"));
    assert!(markdown.contains("- `stable.example.com/v1`: round_trip_mismatch"));
    assert!(markdown.contains("  - missing /webhooks expected={}"));
    assert!(markdown.contains("- Cleanup failed: finalizer stuck"));
    assert!(markdown.contains("## Errors\n\n- None"));
}
