// crates/openapi-conformance-core/src/runtime/scenario.rs
// ============================================================================
// Module: Conformance Scenarios
// Description: Built-in and registered-type conformance scenarios.
// Purpose: Orchestrate discovery, publication waits, and round-trip checks.
// Dependencies: serde, thiserror, tracing, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Each scenario runs its steps sequentially and yields one verdict per
//! group-version it checked.
//!
//! - [`BuiltinScenario`] lists every published group-version, keeps only the
//!   ones selected by its [`GroupFilter`], and round-trips each document.
//!   The filter keeps concurrently running scenarios from observing each
//!   other's registrations.
//! - [`RegisteredTypeScenario`] registers a type through a [`Provisioner`],
//!   waits for its publication, and round-trips the published document. The
//!   dynamic-type and aggregated-server variants share this code path; only
//!   the [`ScenarioKind`] label differs.
//!
//! Registration is always undone once attempted, on every exit path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::core::GroupVersion;
use crate::core::Verdict;
use crate::interfaces::DiscoveryError;
use crate::interfaces::DiscoverySource;
use crate::interfaces::ProvisionError;
use crate::interfaces::Provisioner;
use crate::runtime::roundtrip::RoundTripChecker;
use crate::runtime::waiter::PublicationWaiter;

// ============================================================================
// SECTION: Scenario Metadata
// ============================================================================

/// Scenario classification.
///
/// # Invariants
/// - Variants are stable for report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Built-in group-versions served by the primary backend.
    Builtin,
    /// A dynamically registered custom type.
    DynamicType,
    /// A type served by an externally aggregated server.
    AggregatedType,
}

impl ScenarioKind {
    /// Returns a stable label for the scenario kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::DynamicType => "dynamic_type",
            Self::AggregatedType => "aggregated_type",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one checked group-version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupVersionVerdict {
    /// Checked group-version.
    pub group_version: GroupVersion,
    /// Outcome.
    pub verdict: Verdict,
}

/// Results of one scenario run.
///
/// # Invariants
/// - `results` are in the order the group-versions were checked.
/// - `cleanup_error` is set only when undoing a registration failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Per-group-version verdicts.
    pub results: Vec<GroupVersionVerdict>,
    /// Error raised while undoing the registration, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

impl ScenarioReport {
    /// Returns true when every verdict passed and cleanup succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cleanup_error.is_none() && self.results.iter().all(|result| result.verdict.is_pass())
    }

    /// Iterates over the failing verdicts.
    pub fn failures(&self) -> impl Iterator<Item = &GroupVersionVerdict> {
        self.results.iter().filter(|result| !result.verdict.is_pass())
    }
}

/// Scenario errors that prevent producing a report.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Listing group-versions failed.
    #[error("scenario {scenario}: listing group-versions failed: {source}")]
    Listing {
        /// Scenario name.
        scenario: String,
        /// Underlying discovery error.
        source: DiscoveryError,
    },
    /// Registering the type failed.
    #[error("scenario {scenario}: {source}{}", cleanup_suffix(.cleanup_error.as_deref()))]
    Provisioning {
        /// Scenario name.
        scenario: String,
        /// Underlying provisioning error.
        source: ProvisionError,
        /// Error raised while undoing the partial registration, if any.
        cleanup_error: Option<String>,
    },
    /// The publication wait was cancelled.
    #[error("scenario {scenario}: cancelled while awaiting {target}{}", cleanup_suffix(.cleanup_error.as_deref()))]
    Cancelled {
        /// Scenario name.
        scenario: String,
        /// Awaited group-version.
        target: GroupVersion,
        /// Error raised while undoing the registration, if any.
        cleanup_error: Option<String>,
    },
    /// The allow-set selected none of the listed group-versions.
    #[error("scenario {scenario}: allow-set matched none of {listed} listed group-versions")]
    EmptySelection {
        /// Scenario name.
        scenario: String,
        /// Number of group-versions the endpoint listed.
        listed: usize,
    },
    /// The scenario task stopped before producing a result.
    #[error("scenario {scenario}: aborted: {message}")]
    Aborted {
        /// Scenario name.
        scenario: String,
        /// Why the task stopped.
        message: String,
    },
}

impl ScenarioError {
    /// Returns the name of the scenario that failed.
    #[must_use]
    pub fn scenario(&self) -> &str {
        match self {
            Self::Listing {
                scenario,
                ..
            }
            | Self::Provisioning {
                scenario,
                ..
            }
            | Self::Cancelled {
                scenario,
                ..
            }
            | Self::EmptySelection {
                scenario,
                ..
            }
            | Self::Aborted {
                scenario,
                ..
            } => scenario,
        }
    }
}

/// Formats an optional cleanup error as a message suffix.
fn cleanup_suffix(cleanup_error: Option<&str>) -> String {
    cleanup_error.map_or_else(String::new, |err| format!(" (cleanup: {err})"))
}

// ============================================================================
// SECTION: Group Filter
// ============================================================================

/// Allow-set selecting built-in group-versions.
///
/// # Invariants
/// - A group matches when it is listed exactly or ends with a listed suffix.
/// - Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupFilter {
    /// Exact group names.
    groups: BTreeSet<String>,
    /// Accepted group name suffixes.
    suffixes: Vec<String>,
}

impl GroupFilter {
    /// Creates a filter from exact group names and suffixes.
    #[must_use]
    pub fn new<G, S>(groups: G, suffixes: S) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when the group-version's group is selected.
    #[must_use]
    pub fn matches(&self, group_version: &GroupVersion) -> bool {
        let group = group_version.group();
        self.groups.contains(group)
            || self.suffixes.iter().any(|suffix| !suffix.is_empty() && group.ends_with(suffix))
    }

    /// Returns the selected subset of `group_versions`.
    #[must_use]
    pub fn select(&self, group_versions: &BTreeSet<GroupVersion>) -> BTreeSet<GroupVersion> {
        group_versions.iter().filter(|gv| self.matches(gv)).cloned().collect()
    }
}

// ============================================================================
// SECTION: Built-in Scenario
// ============================================================================

/// Round-trips every selected built-in group-version.
#[derive(Debug, Clone)]
pub struct BuiltinScenario {
    /// Scenario name.
    name: String,
    /// Built-in allow-set.
    filter: GroupFilter,
}

impl BuiltinScenario {
    /// Creates a built-in scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, filter: GroupFilter) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }

    /// Returns the scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the scenario against `source`.
    ///
    /// A selected group-version whose document cannot be fetched yields a
    /// transport verdict for that group-version; the remaining ones are still
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Listing`] when the initial listing fails and
    /// [`ScenarioError::EmptySelection`] when the allow-set selects nothing.
    pub async fn run<S>(
        &self,
        source: &S,
        checker: &RoundTripChecker,
    ) -> Result<ScenarioReport, ScenarioError>
    where
        S: DiscoverySource + ?Sized,
    {
        let listed =
            source.list_group_versions().await.map_err(|source| ScenarioError::Listing {
                scenario: self.name.clone(),
                source,
            })?;
        let selected = self.filter.select(&listed);
        info!(
            scenario = %self.name,
            listed = listed.len(),
            selected = selected.len(),
            "checking built-in group-versions"
        );
        if selected.is_empty() {
            warn!(scenario = %self.name, "no group-versions matched the built-in allow-set");
            return Err(ScenarioError::EmptySelection {
                scenario: self.name.clone(),
                listed: listed.len(),
            });
        }

        let mut results = Vec::with_capacity(selected.len());
        for group_version in selected {
            let verdict = match source.fetch_document(&group_version).await {
                Ok(document) => checker.verify(&document),
                Err(DiscoveryError::NotFound(_)) => Verdict::TransportError {
                    cause: format!("{group_version} was listed but its document is not published"),
                },
                Err(err) => Verdict::TransportError {
                    cause: err.to_string(),
                },
            };
            log_verdict(&self.name, &group_version, &verdict);
            results.push(GroupVersionVerdict {
                group_version,
                verdict,
            });
        }
        Ok(ScenarioReport {
            name: self.name.clone(),
            kind: ScenarioKind::Builtin,
            results,
            cleanup_error: None,
        })
    }
}

// ============================================================================
// SECTION: Registered-Type Scenario
// ============================================================================

/// Registers a type, waits for its publication, and round-trips it.
pub struct RegisteredTypeScenario<P> {
    /// Scenario name.
    name: String,
    /// Dynamic or aggregated.
    kind: ScenarioKind,
    /// Registration collaborator.
    provisioner: P,
}

impl<P> RegisteredTypeScenario<P>
where
    P: Provisioner,
{
    /// Creates a scenario for a dynamically registered custom type.
    #[must_use]
    pub fn dynamic_type(name: impl Into<String>, provisioner: P) -> Self {
        Self {
            name: name.into(),
            kind: ScenarioKind::DynamicType,
            provisioner,
        }
    }

    /// Creates a scenario for a type served by an aggregated server.
    #[must_use]
    pub fn aggregated_type(name: impl Into<String>, provisioner: P) -> Self {
        Self {
            name: name.into(),
            kind: ScenarioKind::AggregatedType,
            provisioner,
        }
    }

    /// Returns the scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scenario kind.
    #[must_use]
    pub const fn kind(&self) -> ScenarioKind {
        self.kind
    }

    /// Runs the scenario against `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Provisioning`] when registration fails and
    /// [`ScenarioError::Cancelled`] when the wait is cancelled. Cleanup has
    /// been attempted in both cases.
    pub async fn run<S>(
        &self,
        source: &S,
        waiter: &PublicationWaiter,
        checker: &RoundTripChecker,
    ) -> Result<ScenarioReport, ScenarioError>
    where
        S: DiscoverySource + ?Sized,
    {
        let group_version = match self.provisioner.register().await {
            Ok(group_version) => group_version,
            Err(source) => {
                let cleanup_error = self.cleanup().await;
                return Err(ScenarioError::Provisioning {
                    scenario: self.name.clone(),
                    source,
                    cleanup_error,
                });
            }
        };
        info!(
            scenario = %self.name,
            kind = self.kind.as_str(),
            group_version = %group_version,
            "type registered; awaiting publication"
        );

        let verdict = match waiter.await_publication(source, &group_version).await {
            Ok(publication) => Some(checker.verify(&publication.document)),
            Err(err) => err.into_verdict(),
        };
        let cleanup_error = self.cleanup().await;

        let Some(verdict) = verdict else {
            return Err(ScenarioError::Cancelled {
                scenario: self.name.clone(),
                target: group_version,
                cleanup_error,
            });
        };
        log_verdict(&self.name, &group_version, &verdict);
        Ok(ScenarioReport {
            name: self.name.clone(),
            kind: self.kind,
            results: vec![GroupVersionVerdict {
                group_version,
                verdict,
            }],
            cleanup_error,
        })
    }

    /// Undoes the registration, returning the error message on failure.
    async fn cleanup(&self) -> Option<String> {
        match self.provisioner.unregister().await {
            Ok(()) => None,
            Err(err) => {
                warn!(scenario = %self.name, error = %err, "failed to undo registration");
                Some(err.to_string())
            }
        }
    }
}

/// Emits a log event for a computed verdict.
fn log_verdict(scenario: &str, group_version: &GroupVersion, verdict: &Verdict) {
    if verdict.is_pass() {
        info!(scenario, group_version = %group_version, verdict = "pass", "group-version verified");
    } else {
        warn!(
            scenario,
            group_version = %group_version,
            verdict = verdict.kind().as_str(),
            detail = %verdict,
            "group-version failed verification"
        );
    }
}
