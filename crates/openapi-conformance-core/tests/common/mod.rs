// crates/openapi-conformance-core/tests/common/mod.rs
// ============================================================================
// Module: Simulated Backend
// Description: In-memory discovery source and provisioner for tests.
// Purpose: Drive scenarios and the waiter without a live cluster.
// Dependencies: openapi-conformance-core, async-trait, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`SimulatedSource`] serves documents from memory and can delay publication
//! by a number of polls, fail individual fetches, or fail listing.
//! [`SimulatedProvisioner`] publishes into a shared source on registration and
//! counts every register and unregister call.

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only helpers use panic-based assertions."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use openapi_conformance_core::DiscoveryError;
use openapi_conformance_core::DiscoverySource;
use openapi_conformance_core::Document;
use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::ProvisionError;
use openapi_conformance_core::Provisioner;
use serde_json::json;

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Returns a well-formed OpenAPI v3 document for `group_version`.
pub fn sample_document(group_version: &GroupVersion) -> Document {
    Document::new(json!({
        "openapi": "3.0.0",
        "info": {"title": "Kubernetes", "version": group_version.to_string()},
        "paths": {
            format!("/apis/{group_version}/widgets"): {
                "get": {
                    "operationId": "listWidgets",
                    "responses": {"200": {"description": "OK"}}
                }
            }
        },
        "components": {
            "schemas": {
                "Widget": {
                    "type": "object",
                    "properties": {"spec": {"type": "object", "x-kubernetes-preserve-unknown-fields": true}}
                }
            }
        },
        "x-kubernetes-group-version-kind": [{"group": group_version.group(), "version": group_version.version()}]
    }))
}

/// Returns a document carrying a top-level field the decoder schema lacks.
pub fn drifted_document(group_version: &GroupVersion) -> Document {
    let mut value = sample_document(group_version).into_value();
    value["webhooks"] = json!({"onWidget": {"post": {}}});
    Document::new(value)
}

// ============================================================================
// SECTION: Discovery Source
// ============================================================================

/// Mutable backend state.
#[derive(Default)]
struct SourceState {
    /// Currently published documents.
    published: BTreeMap<GroupVersion, Document>,
    /// Documents published after the given number of `NotFound` fetches.
    pending: BTreeMap<GroupVersion, (u32, Document)>,
    /// Listed group-versions whose fetch fails with a transport error.
    failing: BTreeMap<GroupVersion, String>,
    /// Listed group-versions without a document.
    phantoms: BTreeSet<GroupVersion>,
    /// Listing failure, if any.
    listing_failure: Option<String>,
    /// Delay applied to every fetch.
    fetch_delay: Option<Duration>,
}

/// In-memory discovery source.
#[derive(Default)]
pub struct SimulatedSource {
    /// Backend state.
    state: Mutex<SourceState>,
    /// Number of fetch calls observed.
    fetches: AtomicU32,
}

impl SimulatedSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source publishing a sample document for each group-version.
    pub fn with_groups<'a>(group_versions: impl IntoIterator<Item = &'a GroupVersion>) -> Self {
        let source = Self::new();
        for group_version in group_versions {
            source.publish(group_version.clone(), sample_document(group_version));
        }
        source
    }

    /// Publishes a document immediately.
    pub fn publish(&self, group_version: GroupVersion, document: Document) {
        self.state.lock().unwrap().published.insert(group_version, document);
    }

    /// Publishes a document after `not_found_polls` fetches return `NotFound`.
    pub fn publish_after(&self, group_version: GroupVersion, document: Document, not_found_polls: u32) {
        self.state.lock().unwrap().pending.insert(group_version, (not_found_polls, document));
    }

    /// Withdraws a group-version.
    pub fn withdraw(&self, group_version: &GroupVersion) {
        let mut state = self.state.lock().unwrap();
        state.published.remove(group_version);
        state.pending.remove(group_version);
    }

    /// Lists a group-version whose fetch fails with a transport error.
    pub fn fail_fetch(&self, group_version: GroupVersion, cause: &str) {
        self.state.lock().unwrap().failing.insert(group_version, cause.to_string());
    }

    /// Lists a group-version that has no document.
    pub fn list_phantom(&self, group_version: GroupVersion) {
        self.state.lock().unwrap().phantoms.insert(group_version);
    }

    /// Makes every listing call fail.
    pub fn fail_listing(&self, cause: &str) {
        self.state.lock().unwrap().listing_failure = Some(cause.to_string());
    }

    /// Delays every fetch by `delay`.
    pub fn delay_fetches(&self, delay: Duration) {
        self.state.lock().unwrap().fetch_delay = Some(delay);
    }

    /// Returns true when the group-version is currently published.
    pub fn is_published(&self, group_version: &GroupVersion) -> bool {
        let state = self.state.lock().unwrap();
        state.published.contains_key(group_version) || state.pending.contains_key(group_version)
    }

    /// Returns the number of fetch calls observed.
    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Resolves one fetch against the current state.
    fn resolve(&self, group_version: &GroupVersion) -> Result<Document, DiscoveryError> {
        let mut state = self.state.lock().unwrap();
        if let Some(cause) = state.failing.get(group_version) {
            return Err(DiscoveryError::Transport(cause.clone()));
        }
        if let Some(document) = state.published.get(group_version) {
            return Ok(document.clone());
        }
        let ready = match state.pending.get_mut(group_version) {
            Some((0, _)) => true,
            Some((remaining, _)) => {
                *remaining -= 1;
                false
            }
            None => false,
        };
        if ready {
            let (_, document) = state.pending.remove(group_version).unwrap();
            state.published.insert(group_version.clone(), document.clone());
            return Ok(document);
        }
        Err(DiscoveryError::NotFound(group_version.clone()))
    }
}

#[async_trait]
impl DiscoverySource for SimulatedSource {
    async fn list_group_versions(&self) -> Result<BTreeSet<GroupVersion>, DiscoveryError> {
        let state = self.state.lock().unwrap();
        if let Some(cause) = &state.listing_failure {
            return Err(DiscoveryError::Transport(cause.clone()));
        }
        let mut listed: BTreeSet<GroupVersion> = state.published.keys().cloned().collect();
        listed.extend(state.failing.keys().cloned());
        listed.extend(state.phantoms.iter().cloned());
        Ok(listed)
    }

    async fn fetch_document(
        &self,
        group_version: &GroupVersion,
    ) -> Result<Document, DiscoveryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.state.lock().unwrap().fetch_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.resolve(group_version)
    }
}

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Provisioner that publishes into a [`SimulatedSource`].
pub struct SimulatedProvisioner {
    /// Backend receiving the registration.
    source: Arc<SimulatedSource>,
    /// Group-version the registration publishes.
    target: GroupVersion,
    /// Document published for the target.
    document: Document,
    /// `NotFound` polls before publication; `None` never publishes.
    publish_after: Option<u32>,
    /// Registration failure, if any.
    register_failure: Option<String>,
    /// Unregistration failure, if any.
    unregister_failure: Option<String>,
    /// Number of register calls.
    registers: AtomicU32,
    /// Number of unregister calls.
    unregisters: AtomicU32,
}

impl SimulatedProvisioner {
    /// Creates a provisioner that publishes `target` after `polls` misses.
    pub fn new(source: Arc<SimulatedSource>, target: GroupVersion, polls: u32) -> Self {
        let document = sample_document(&target);
        Self {
            source,
            target,
            document,
            publish_after: Some(polls),
            register_failure: None,
            unregister_failure: None,
            registers: AtomicU32::new(0),
            unregisters: AtomicU32::new(0),
        }
    }

    /// Replaces the published document.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    /// Registers successfully but never publishes.
    pub fn never_publishes(mut self) -> Self {
        self.publish_after = None;
        self
    }

    /// Fails registration with `cause`.
    pub fn failing_register(mut self, cause: &str) -> Self {
        self.register_failure = Some(cause.to_string());
        self
    }

    /// Fails unregistration with `cause`.
    pub fn failing_unregister(mut self, cause: &str) -> Self {
        self.unregister_failure = Some(cause.to_string());
        self
    }

    /// Returns the number of register calls.
    pub fn register_count(&self) -> u32 {
        self.registers.load(Ordering::SeqCst)
    }

    /// Returns the number of unregister calls.
    pub fn unregister_count(&self) -> u32 {
        self.unregisters.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provisioner for SimulatedProvisioner {
    async fn register(&self) -> Result<GroupVersion, ProvisionError> {
        self.registers.fetch_add(1, Ordering::SeqCst);
        if let Some(cause) = &self.register_failure {
            return Err(ProvisionError::Register(cause.clone()));
        }
        if let Some(polls) = self.publish_after {
            self.source.publish_after(self.target.clone(), self.document.clone(), polls);
        }
        Ok(self.target.clone())
    }

    async fn unregister(&self) -> Result<(), ProvisionError> {
        self.unregisters.fetch_add(1, Ordering::SeqCst);
        self.source.withdraw(&self.target);
        match &self.unregister_failure {
            Some(cause) => Err(ProvisionError::Unregister(cause.clone())),
            None => Ok(()),
        }
    }
}

/// Provisioner handle shared between a scenario and its test.
pub struct SharedProvisioner(pub Arc<SimulatedProvisioner>);

#[async_trait]
impl Provisioner for SharedProvisioner {
    async fn register(&self) -> Result<GroupVersion, ProvisionError> {
        self.0.register().await
    }

    async fn unregister(&self) -> Result<(), ProvisionError> {
        self.0.unregister().await
    }
}
