// crates/openapi-conformance-http/src/lib.rs
// ============================================================================
// Module: OpenAPI Conformance HTTP
// Description: HTTP-backed discovery source for live API servers.
// Purpose: Connect the verifier to a real `/openapi/v3` endpoint.
// Dependencies: openapi-conformance-core, reqwest
// ============================================================================

//! ## Overview
//! Implements [`openapi_conformance_core::DiscoverySource`] over HTTP.

pub mod source;

pub use source::DEFAULT_MAX_RESPONSE_BYTES;
pub use source::DEFAULT_REQUEST_TIMEOUT;
pub use source::HttpDiscoverySource;
pub use source::HttpSourceConfig;
pub use source::HttpSourceError;
pub use source::OPENAPI_V3_ROOT_PATH;
pub use source::group_version_from_path;
