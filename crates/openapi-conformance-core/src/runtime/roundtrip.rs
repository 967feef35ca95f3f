// crates/openapi-conformance-core/src/runtime/roundtrip.rs
// ============================================================================
// Module: Round-Trip Checker
// Description: Serialize, deserialize, and compare discovery documents.
// Purpose: Catch asymmetries at the client serialization boundary.
// Dependencies: serde, tracing, crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! The checker encodes the original document through a [`WireCodec`],
//! decodes the bytes back, and compares the reconstruction with the original
//! using JSON data-model equality. Any information loss is a
//! [`Verdict::RoundTripMismatch`] carrying a structural diff. Codec failures
//! are serialization-transport failures and surface as
//! [`Verdict::TransportError`].
//!
//! With [`ComparisonMode::EncodedFixpoint`] the checker additionally requires
//! that re-encoding the reconstruction yields the same bytes as the first
//! encoding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::DiffEntry;
use crate::core::DiffKind;
use crate::core::Document;
use crate::core::RoundTripDiff;
use crate::core::Verdict;
use crate::runtime::codec::CodecError;
use crate::runtime::codec::WireCodec;
use crate::runtime::diff::structural_diff;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cap on recorded diff entries per verdict.
pub const DEFAULT_MAX_DIFF_ENTRIES: usize = 64;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// How the reconstruction is compared with the original.
///
/// # Invariants
/// - Variants are stable for configuration parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Decoded-value equality only.
    #[default]
    Decoded,
    /// Decoded-value equality plus byte equality of the two encodings.
    EncodedFixpoint,
}

// ============================================================================
// SECTION: Checker
// ============================================================================

/// Round-trip equivalence checker.
///
/// # Invariants
/// - Never mutates the original document.
/// - Stateless across calls; safe to share between scenarios.
#[derive(Clone)]
pub struct RoundTripChecker {
    /// Codec modelling the client serialization boundary.
    codec: Arc<dyn WireCodec>,
    /// Comparison strictness.
    mode: ComparisonMode,
    /// Maximum diff entries recorded per verdict.
    max_diff_entries: usize,
}

impl RoundTripChecker {
    /// Creates a checker over `codec` with decoded-value comparison.
    #[must_use]
    pub fn new(codec: Arc<dyn WireCodec>) -> Self {
        Self {
            codec,
            mode: ComparisonMode::Decoded,
            max_diff_entries: DEFAULT_MAX_DIFF_ENTRIES,
        }
    }

    /// Sets the comparison mode.
    #[must_use]
    pub const fn with_comparison(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum number of recorded diff entries.
    #[must_use]
    pub const fn with_max_diff_entries(mut self, max_diff_entries: usize) -> Self {
        self.max_diff_entries = max_diff_entries;
        self
    }

    /// Returns the codec name.
    #[must_use]
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    /// Verifies that `original` survives a round trip through the codec.
    #[must_use]
    pub fn verify(&self, original: &Document) -> Verdict {
        match self.round_trip(original) {
            Ok(verdict) => verdict,
            Err(err) => Verdict::TransportError {
                cause: err.to_string(),
            },
        }
    }

    /// Runs the round trip and comparison.
    fn round_trip(&self, original: &Document) -> Result<Verdict, CodecError> {
        let encoded = self.codec.encode(original)?;
        let reconstructed = self.codec.decode(&encoded)?;
        if reconstructed != *original {
            let diff = structural_diff(
                original.as_value(),
                reconstructed.as_value(),
                self.max_diff_entries,
            );
            debug!(
                codec = self.codec.name(),
                differences = diff.total(),
                "round trip altered document"
            );
            return Ok(Verdict::RoundTripMismatch {
                diff,
            });
        }
        if self.mode == ComparisonMode::EncodedFixpoint {
            let reencoded = self.codec.encode(&reconstructed)?;
            if reencoded != encoded {
                return Ok(Verdict::RoundTripMismatch {
                    diff: encoding_diff(&encoded, &reencoded),
                });
            }
        }
        Ok(Verdict::Pass)
    }
}

/// Builds a root-level diff for encodings that differ while values match.
fn encoding_diff(first: &[u8], second: &[u8]) -> RoundTripDiff {
    RoundTripDiff {
        entries: vec![DiffEntry {
            path: String::new(),
            kind: DiffKind::Changed,
            expected: Some(Value::String(String::from_utf8_lossy(first).into_owned())),
            actual: Some(Value::String(String::from_utf8_lossy(second).into_owned())),
        }],
        omitted: 0,
    }
}
