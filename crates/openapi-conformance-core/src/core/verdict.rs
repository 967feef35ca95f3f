// crates/openapi-conformance-core/src/core/verdict.rs
// ============================================================================
// Module: Verdicts
// Description: Per-group-version verification outcomes with diagnostics.
// Purpose: Report pass/fail results that are actionable without a rerun.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Verdict`] is the outcome of checking one group-version. Failing
//! verdicts always carry their diagnostic payload: a structural diff for
//! round-trip mismatches, the wait parameters for timeouts, or the underlying
//! cause for transport failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

// ============================================================================
// SECTION: Structural Diff
// ============================================================================

/// Classification of a single differing node.
///
/// # Invariants
/// - Variants are stable for report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Present in the original, absent after the round trip.
    Missing,
    /// Absent in the original, present after the round trip.
    Unexpected,
    /// Present on both sides with different values.
    Changed,
}

impl DiffKind {
    /// Returns a stable label for the diff kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Unexpected => "unexpected",
            Self::Changed => "changed",
        }
    }
}

/// One differing node between the original and reconstructed values.
///
/// # Invariants
/// - `path` is an RFC 6901 JSON pointer; the empty string is the root.
/// - `expected` is `None` only for [`DiffKind::Unexpected`].
/// - `actual` is `None` only for [`DiffKind::Missing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    /// JSON pointer to the differing node.
    pub path: String,
    /// Difference classification.
    pub kind: DiffKind,
    /// Value in the original document.
    pub expected: Option<Value>,
    /// Value in the reconstructed document.
    pub actual: Option<Value>,
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
        write!(f, "{} {path}", self.kind.as_str())?;
        if let Some(expected) = &self.expected {
            write!(f, " expected={expected}")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, " actual={actual}")?;
        }
        Ok(())
    }
}

/// Structural diff produced by a failed round trip.
///
/// # Invariants
/// - `entries` are ordered by traversal (object keys sorted, array indices ascending).
/// - `omitted` counts differences beyond the configured entry limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundTripDiff {
    /// Recorded differing nodes.
    pub entries: Vec<DiffEntry>,
    /// Number of differing nodes not recorded due to the entry limit.
    pub omitted: usize,
}

impl RoundTripDiff {
    /// Returns true when no differences were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.omitted == 0
    }

    /// Returns the total number of differing nodes, including omitted ones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len().saturating_add(self.omitted)
    }
}

impl fmt::Display for RoundTripDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{entry}")?;
        }
        if self.omitted > 0 {
            write!(f, "\n... {} more differences omitted", self.omitted)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Verdict kind labels.
///
/// # Invariants
/// - Variants are stable for report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Check passed.
    Pass,
    /// Round trip lost or altered information.
    RoundTripMismatch,
    /// Publication was not observed before the deadline.
    Timeout,
    /// Transport or serialization failure.
    TransportError,
}

impl VerdictKind {
    /// Returns a stable label for the verdict kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::RoundTripMismatch => "round_trip_mismatch",
            Self::Timeout => "timeout",
            Self::TransportError => "transport_error",
        }
    }
}

/// Outcome of checking one group-version.
///
/// # Invariants
/// - Every non-pass variant carries a diagnostic payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// The document round-tripped without information loss.
    Pass,
    /// The reconstructed document differs from the original.
    RoundTripMismatch {
        /// Structural diff between original and reconstruction.
        diff: RoundTripDiff,
    },
    /// The group-version was not published before the deadline.
    Timeout {
        /// Wall-clock time spent polling.
        #[serde(rename = "waited_ms", serialize_with = "serialize_millis")]
        waited: Duration,
        /// Poll interval in effect.
        #[serde(rename = "interval_ms", serialize_with = "serialize_millis")]
        interval: Duration,
        /// Number of fetch attempts made.
        attempts: u32,
    },
    /// Connectivity, auth, or serialization-transport failure.
    TransportError {
        /// Underlying error description.
        cause: String,
    },
}

impl Verdict {
    /// Returns the verdict kind label.
    #[must_use]
    pub const fn kind(&self) -> VerdictKind {
        match self {
            Self::Pass => VerdictKind::Pass,
            Self::RoundTripMismatch {
                ..
            } => VerdictKind::RoundTripMismatch,
            Self::Timeout {
                ..
            } => VerdictKind::Timeout,
            Self::TransportError {
                ..
            } => VerdictKind::TransportError,
        }
    }

    /// Returns true for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::RoundTripMismatch {
                diff,
            } => write!(f, "round_trip_mismatch ({} differences)\n{diff}", diff.total()),
            Self::Timeout {
                waited,
                interval,
                attempts,
            } => write!(
                f,
                "timeout after {} ms ({attempts} attempts at {} ms interval)",
                waited.as_millis(),
                interval.as_millis()
            ),
            Self::TransportError {
                cause,
            } => write!(f, "transport_error: {cause}"),
        }
    }
}

/// Serializes a duration as whole milliseconds.
fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}
