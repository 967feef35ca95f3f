// crates/openapi-conformance-core/src/lib.rs
// ============================================================================
// Module: OpenAPI Conformance Core Library
// Description: Public API surface for the discovery conformance verifier.
// Purpose: Expose the data model, capability interfaces, and runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The verifier checks that every OpenAPI v3 document published by a
//! discovery endpoint survives a serialize/deserialize round trip through the
//! client decoder schema, and that newly registered types become discoverable
//! within a bounded time. It reaches the live system only through
//! [`DiscoverySource`] and [`Provisioner`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::DiscoveryError;
pub use interfaces::DiscoverySource;
pub use interfaces::ProvisionError;
pub use interfaces::Provisioner;
pub use runtime::BuiltinScenario;
pub use runtime::CancelHandle;
pub use runtime::CancelSignal;
pub use runtime::CodecKind;
pub use runtime::ComparisonMode;
pub use runtime::ConformanceReport;
pub use runtime::GroupFilter;
pub use runtime::PollPolicy;
pub use runtime::PublicationWaiter;
pub use runtime::RegisteredTypeScenario;
pub use runtime::RoundTripChecker;
pub use runtime::RunStatus;
pub use runtime::ScenarioError;
pub use runtime::ScenarioKind;
pub use runtime::ScenarioReport;
pub use runtime::WaitError;
pub use runtime::WireCodec;
pub use runtime::cancel_pair;
pub use runtime::collect_snapshot;
