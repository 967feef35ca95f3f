// crates/openapi-conformance-core/src/runtime/diff.rs
// ============================================================================
// Module: Structural Diff
// Description: Node-by-node comparison of two structured values.
// Purpose: Turn a failed round trip into path + expected + actual entries.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! The diff walks both values in lockstep. Objects are compared by key set
//! and per-key value; arrays are compared index by index; anything else is
//! compared for equality. A node whose type differs on the two sides is
//! reported once as `changed` without descending into it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::DiffEntry;
use crate::core::DiffKind;
use crate::core::RoundTripDiff;

// ============================================================================
// SECTION: Diff Construction
// ============================================================================

/// Computes the structural diff between `expected` and `actual`.
///
/// At most `limit` entries are recorded; further differences are counted in
/// [`RoundTripDiff::omitted`].
#[must_use]
pub fn structural_diff(expected: &Value, actual: &Value, limit: usize) -> RoundTripDiff {
    let mut collector = DiffCollector {
        limit,
        diff: RoundTripDiff::default(),
    };
    let mut path = String::new();
    collector.walk(&mut path, expected, actual);
    collector.diff
}

/// Accumulates diff entries up to a limit.
struct DiffCollector {
    /// Maximum recorded entries.
    limit: usize,
    /// Diff under construction.
    diff: RoundTripDiff,
}

impl DiffCollector {
    /// Compares two nodes located at `path`.
    fn walk(&mut self, path: &mut String, expected: &Value, actual: &Value) {
        match (expected, actual) {
            (Value::Object(expected_map), Value::Object(actual_map)) => {
                for (key, expected_value) in expected_map {
                    let restore = push_segment(path, key);
                    match actual_map.get(key) {
                        Some(actual_value) => self.walk(path, expected_value, actual_value),
                        None => self.record(path, DiffKind::Missing, Some(expected_value), None),
                    }
                    path.truncate(restore);
                }
                for (key, actual_value) in actual_map {
                    if expected_map.contains_key(key) {
                        continue;
                    }
                    let restore = push_segment(path, key);
                    self.record(path, DiffKind::Unexpected, None, Some(actual_value));
                    path.truncate(restore);
                }
            }
            (Value::Array(expected_items), Value::Array(actual_items)) => {
                let longest = expected_items.len().max(actual_items.len());
                for index in 0..longest {
                    let restore = push_segment(path, &index.to_string());
                    match (expected_items.get(index), actual_items.get(index)) {
                        (Some(expected_item), Some(actual_item)) => {
                            self.walk(path, expected_item, actual_item);
                        }
                        (Some(expected_item), None) => {
                            self.record(path, DiffKind::Missing, Some(expected_item), None);
                        }
                        (None, Some(actual_item)) => {
                            self.record(path, DiffKind::Unexpected, None, Some(actual_item));
                        }
                        (None, None) => {}
                    }
                    path.truncate(restore);
                }
            }
            _ => {
                if expected != actual {
                    self.record(path, DiffKind::Changed, Some(expected), Some(actual));
                }
            }
        }
    }

    /// Records one differing node, or counts it once the limit is reached.
    fn record(
        &mut self,
        path: &str,
        kind: DiffKind,
        expected: Option<&Value>,
        actual: Option<&Value>,
    ) {
        if self.diff.entries.len() >= self.limit {
            self.diff.omitted = self.diff.omitted.saturating_add(1);
            return;
        }
        self.diff.entries.push(DiffEntry {
            path: path.to_string(),
            kind,
            expected: expected.cloned(),
            actual: actual.cloned(),
        });
    }
}

// ============================================================================
// SECTION: JSON Pointer Helpers
// ============================================================================

/// Appends an escaped JSON pointer segment and returns the previous length.
fn push_segment(path: &mut String, segment: &str) -> usize {
    let restore = path.len();
    path.push('/');
    for ch in segment.chars() {
        match ch {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
    restore
}

// ============================================================================
// SECTION: Tests
// ============================================================================
