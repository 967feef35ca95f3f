// crates/openapi-conformance-core/src/core/document.rs
// ============================================================================
// Module: Discovery Documents
// Description: Opaque interface-description values and point-in-time snapshots.
// Purpose: Carry published documents between discovery and verification.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Document`] is one group-version's interface description as an opaque
//! structured value. The verifier never inspects individual fields; documents
//! are compared wholesale. A [`DiscoveryResult`] is a snapshot of documents
//! observed during a single query pass and is never reused across passes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::GroupVersion;

// ============================================================================
// SECTION: Document
// ============================================================================

/// Published interface description for one group-version.
///
/// # Invariants
/// - Treated as immutable once obtained from a discovery source.
/// - Equality follows the JSON data model: arrays are order-sensitive,
///   objects compare by key set and per-key value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    /// Wraps a structured value as a document.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying structured value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document and returns the underlying value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Discovery Snapshot
// ============================================================================

/// Documents observed during a single discovery pass.
///
/// # Invariants
/// - Each entry reflects the backend at the time it was fetched.
/// - Never cached or merged across passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryResult {
    /// Documents keyed by group-version.
    documents: BTreeMap<GroupVersion, Document>,
}

impl DiscoveryResult {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    /// Records a fetched document, returning any previous entry.
    pub fn insert(&mut self, group_version: GroupVersion, document: Document) -> Option<Document> {
        self.documents.insert(group_version, document)
    }

    /// Returns the document for a group-version, if observed.
    #[must_use]
    pub fn get(&self, group_version: &GroupVersion) -> Option<&Document> {
        self.documents.get(group_version)
    }

    /// Returns the number of documents in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true when the snapshot holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates over documents in group-version order.
    pub fn iter(&self) -> btree_map::Iter<'_, GroupVersion, Document> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a DiscoveryResult {
    type IntoIter = btree_map::Iter<'a, GroupVersion, Document>;
    type Item = (&'a GroupVersion, &'a Document);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
