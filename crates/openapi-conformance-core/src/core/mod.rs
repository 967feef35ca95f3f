// crates/openapi-conformance-core/src/core/mod.rs
// ============================================================================
// Module: Conformance Data Model
// Description: Value types shared by discovery, verification, and reporting.
// Purpose: Group identifiers, documents, verdicts, and the decoder schema.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Pure value types. Nothing in this module performs I/O or holds state
//! across scenario runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod document;
pub mod identifiers;
pub mod openapi;
pub mod verdict;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use document::DiscoveryResult;
pub use document::Document;
pub use identifiers::GroupVersion;
pub use openapi::Field;
pub use openapi::Info;
pub use openapi::OpenApiDocument;
pub use verdict::DiffEntry;
pub use verdict::DiffKind;
pub use verdict::RoundTripDiff;
pub use verdict::Verdict;
pub use verdict::VerdictKind;
