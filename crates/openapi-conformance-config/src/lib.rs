// crates/openapi-conformance-config/src/lib.rs
// ============================================================================
// Module: OpenAPI Conformance Config Library
// Description: Canonical config model, validation, and environment overrides.
// Purpose: Single source of truth for openapi-conformance.toml semantics.
// Dependencies: openapi-conformance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `openapi-conformance-config` defines the configuration model for the
//! verifier: the discovery endpoint, polling bounds, the built-in allow-set,
//! round-trip settings, and registered-type scenarios. Validation fails
//! closed and every section converts into the runtime type it configures.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
