// crates/openapi-conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Conformance Runtime
// Description: Codecs, round-trip checking, polling, scenarios, and reports.
// Purpose: Execute conformance scenarios against discovery sources.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the verification pipeline. Scenarios drive the
//! waiter and checker; the waiter and checker depend only on the capability
//! interfaces, so every piece runs against simulated backends.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cancel;
pub mod codec;
pub mod diff;
pub mod report;
pub mod roundtrip;
pub mod scenario;
pub mod snapshot;
pub mod waiter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cancel::CancelHandle;
pub use cancel::CancelSignal;
pub use cancel::cancel_pair;
pub use codec::CodecError;
pub use codec::CodecKind;
pub use codec::JsonCodec;
pub use codec::OpenApiV3Codec;
pub use codec::SchemaCodec;
pub use codec::WireCodec;
pub use codec::json_codec;
pub use codec::openapi_v3_codec;
pub use diff::structural_diff;
pub use report::ConformanceReport;
pub use report::ReportError;
pub use report::ReportSummary;
pub use report::RunStatus;
pub use report::ScenarioFailure;
pub use roundtrip::ComparisonMode;
pub use roundtrip::DEFAULT_MAX_DIFF_ENTRIES;
pub use roundtrip::RoundTripChecker;
pub use scenario::BuiltinScenario;
pub use scenario::GroupFilter;
pub use scenario::GroupVersionVerdict;
pub use scenario::RegisteredTypeScenario;
pub use scenario::ScenarioError;
pub use scenario::ScenarioKind;
pub use scenario::ScenarioReport;
pub use snapshot::collect_snapshot;
pub use waiter::PollPolicy;
pub use waiter::PollPolicyError;
pub use waiter::Publication;
pub use waiter::PublicationWaiter;
pub use waiter::WaitError;
