// crates/openapi-conformance-core/src/runtime/report.rs
// ============================================================================
// Module: Conformance Report
// Description: Aggregates scenario outcomes into a single report.
// Purpose: Produce deterministic JSON and Markdown summaries of a run.
// Dependencies: serde, serde_jcs, thiserror, crate::runtime
// ============================================================================

//! ## Overview
//! A [`ConformanceReport`] collects every scenario outcome of one run. Reports
//! and errors are sorted by scenario name, so concurrently executed scenarios
//! always serialize identically. JSON output uses RFC 8785 canonical
//! serialization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::Verdict;
use crate::runtime::scenario::ScenarioError;
use crate::runtime::scenario::ScenarioReport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Report serialization errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Canonical JSON serialization failed.
    #[error("report serialization failed: {0}")]
    Serialize(String),
}

/// Overall run status.
///
/// # Invariants
/// - `Error` outranks `Fail`, which outranks `Pass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every check passed.
    Pass,
    /// At least one verdict failed or cleanup failed.
    Fail,
    /// At least one scenario could not produce a report.
    Error,
}

impl RunStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

/// A scenario that ended without a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioFailure {
    /// Scenario name.
    pub scenario: String,
    /// Error description.
    pub message: String,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    /// Scenarios that produced a report.
    pub scenarios: usize,
    /// Scenarios that produced a passing report.
    pub scenarios_passed: usize,
    /// Scenarios that ended with an error.
    pub scenarios_errored: usize,
    /// Group-versions checked across all scenarios.
    pub checks: usize,
    /// Checks with a failing verdict.
    pub checks_failed: usize,
}

/// Results of a full conformance run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConformanceReport {
    /// Overall status.
    pub status: RunStatus,
    /// Codec used for round trips.
    pub codec: String,
    /// Aggregate counts.
    pub summary: ReportSummary,
    /// Scenario reports, sorted by name.
    pub scenarios: Vec<ScenarioReport>,
    /// Scenarios that ended with an error, sorted by name.
    pub errors: Vec<ScenarioFailure>,
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl ConformanceReport {
    /// Builds a report from scenario outcomes.
    #[must_use]
    pub fn from_outcomes<I>(codec: impl Into<String>, outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<ScenarioReport, ScenarioError>>,
    {
        let mut scenarios = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => scenarios.push(report),
                Err(err) => errors.push(ScenarioFailure {
                    scenario: err.scenario().to_string(),
                    message: err.to_string(),
                }),
            }
        }
        scenarios.sort_by(|left, right| left.name.cmp(&right.name));
        errors.sort_by(|left, right| left.scenario.cmp(&right.scenario));

        let summary = ReportSummary {
            scenarios: scenarios.len(),
            scenarios_passed: scenarios.iter().filter(|report| report.passed()).count(),
            scenarios_errored: errors.len(),
            checks: scenarios.iter().map(|report| report.results.len()).sum(),
            checks_failed: scenarios.iter().map(|report| report.failures().count()).sum(),
        };
        let status = if !errors.is_empty() {
            RunStatus::Error
        } else if summary.scenarios_passed == summary.scenarios {
            RunStatus::Pass
        } else {
            RunStatus::Fail
        };
        Self {
            status,
            codec: codec.into(),
            summary,
            scenarios,
            errors,
        }
    }

    /// Serializes the report as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] when serialization fails.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, ReportError> {
        serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))
    }

    /// Renders the report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        MarkdownReport(self).to_string()
    }
}

// ============================================================================
// SECTION: Markdown Rendering
// ============================================================================

/// Markdown view of a report.
struct MarkdownReport<'a>(&'a ConformanceReport);

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "# Discovery Conformance Report\n")?;
        writeln!(f, "## Status\n")?;
        writeln!(f, "- Status: {}", report.status.as_str())?;
        writeln!(f, "- Codec: {}", report.codec)?;
        writeln!(
            f,
            "- Scenarios: {} passed of {}",
            report.summary.scenarios_passed, report.summary.scenarios
        )?;
        writeln!(
            f,
            "- Checks: {} failed of {}",
            report.summary.checks_failed, report.summary.checks
        )?;

        writeln!(f, "\n## Scenarios\n")?;
        if report.scenarios.is_empty() {
            writeln!(f, "- None")?;
        }
        for scenario in &report.scenarios {
            let status = if scenario.passed() { "pass" } else { "fail" };
            writeln!(f, "### {} ({}): {status}\n", scenario.name, scenario.kind)?;
            if scenario.results.is_empty() {
                writeln!(f, "- No group-versions checked")?;
            }
            for result in &scenario.results {
                writeln!(
                    f,
                    "- `{}`: {}",
                    result.group_version,
                    result.verdict.kind().as_str()
                )?;
                write_verdict_detail(f, &result.verdict)?;
            }
            if let Some(cleanup_error) = &scenario.cleanup_error {
                writeln!(f, "- Cleanup failed: {cleanup_error}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "## Errors\n")?;
        if report.errors.is_empty() {
            writeln!(f, "- None")?;
        }
        for error in &report.errors {
            writeln!(f, "- {}: {}", error.scenario, error.message)?;
        }
        Ok(())
    }
}

/// Writes the diagnostic payload of a failing verdict.
fn write_verdict_detail(f: &mut fmt::Formatter<'_>, verdict: &Verdict) -> fmt::Result {
    match verdict {
        Verdict::Pass => Ok(()),
        Verdict::RoundTripMismatch {
            diff,
        } => {
            for entry in &diff.entries {
                writeln!(f, "  - {entry}")?;
            }
            if diff.omitted > 0 {
                writeln!(f, "  - ... {} more differences omitted", diff.omitted)?;
            }
            Ok(())
        }
        Verdict::Timeout {
            ..
        }
        | Verdict::TransportError {
            ..
        } => writeln!(f, "  - {verdict}"),
    }
}
