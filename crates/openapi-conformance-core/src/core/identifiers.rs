// crates/openapi-conformance-core/src/core/identifiers.rs
// ============================================================================
// Module: Group-Version Identifiers
// Description: Canonical API group-version key used for discovery lookups.
// Purpose: Provide an immutable, totally ordered identifier with a stable wire form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`GroupVersion`] names one published interface description. Equality is
//! exact string equality on both fields; no case folding or trimming is
//! applied. The legacy core group is represented by the empty group name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// API group-version pair used as the discovery lookup key.
///
/// # Invariants
/// - Immutable after construction; fields are compared byte-for-byte.
/// - Ordering is by group, then version, so listings are deterministic.
/// - An empty `group` denotes the legacy core group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersion {
    /// API group name (empty for the core group).
    group: String,
    /// API version within the group.
    version: String,
}

impl GroupVersion {
    /// Creates a new group-version pair.
    #[must_use]
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Creates a group-version in the legacy core group.
    #[must_use]
    pub fn core(version: impl Into<String>) -> Self {
        Self::new(String::new(), version)
    }

    /// Returns the group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the version name.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns true when this group-version belongs to the core group.
    #[must_use]
    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            f.write_str(&self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}
