// crates/openapi-conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Conformance Interfaces
// Description: Capability interfaces for discovery and type registration.
// Purpose: Define the narrow seams between the verifier and its collaborators.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The verifier reaches the live system only through these traits, so every
//! scenario can run against a simulated backend. Discovery is read-only and
//! must not cache: each call observes the backend as it is now. Provisioners
//! create and remove one registered type per scenario.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Document;
use crate::core::GroupVersion;

// ============================================================================
// SECTION: Discovery Source
// ============================================================================

/// Discovery errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `NotFound` means "not currently published" and is the only variant a
///   poll loop may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The group-version is not currently published.
    #[error("group-version {0} is not published")]
    NotFound(GroupVersion),
    /// Connectivity, auth, or payload failure.
    #[error("discovery transport error: {0}")]
    Transport(String),
}

/// Read-only view of the discovery endpoint.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Lists every group-version currently published.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Transport`] on connectivity or auth failure.
    async fn list_group_versions(&self) -> Result<BTreeSet<GroupVersion>, DiscoveryError>;

    /// Fetches the current document for one group-version.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotFound`] when the group-version is not
    /// published and [`DiscoveryError::Transport`] for any other failure.
    async fn fetch_document(&self, group_version: &GroupVersion)
    -> Result<Document, DiscoveryError>;
}

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Type registration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// Registering the type failed.
    #[error("registration failed: {0}")]
    Register(String),
    /// Removing the type failed.
    #[error("unregistration failed: {0}")]
    Unregister(String),
}

/// Registers and removes one dynamically published type.
///
/// Implementations track what they created; `unregister` must be safe to call
/// after a partial or failed `register`.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Registers the type and returns the group-version it will publish.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Register`] when registration fails.
    async fn register(&self) -> Result<GroupVersion, ProvisionError>;

    /// Removes the registered type.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Unregister`] when removal fails.
    async fn unregister(&self) -> Result<(), ProvisionError>;
}
