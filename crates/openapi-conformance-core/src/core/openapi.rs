// crates/openapi-conformance-core/src/core/openapi.rs
// ============================================================================
// Module: OpenAPI v3 Document Model
// Description: Typed decoder schema for published OpenAPI v3 documents.
// Purpose: Mirror the client-side model documents are decoded into.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This is the typed shape a discovery client decodes documents into. It
//! keeps the top-level OpenAPI v3 fields and vendor extensions (`x-*` keys).
//! Other unknown fields are dropped on decode, exactly like a client built
//! against an older schema revision. Round-tripping through this model is
//! therefore lossy for such documents, and the round-trip check reports it.
//!
//! Known fields are [`Field`] values, so an explicit `null` and an absent key
//! stay distinct through decode and encode. Every known field is optional,
//! including `openapi`; a document outside the schema decodes to whatever
//! subset it shares with it and the difference shows up as a diff.
//!
//! Nested structures below the top level (paths, components, schemas) are
//! kept as opaque JSON values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key prefix that marks a vendor extension.
pub const EXTENSION_PREFIX: &str = "x-";

// ============================================================================
// SECTION: Field Presence
// ============================================================================

/// Known field that records whether it was absent, `null`, or set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Key not present in the document.
    #[default]
    Absent,
    /// Key present with an explicit `null`.
    Null,
    /// Key present with a value.
    Value(T),
}

impl<T> Field<T> {
    /// Returns true when the key was not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the value when one is set.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(value) => value.serialize(serializer),
            // Absent fields are skipped by the containing struct.
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Value))
    }
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Top-level OpenAPI v3 document.
///
/// # Invariants
/// - `extensions` only holds keys starting with [`EXTENSION_PREFIX`].
/// - [`Field::Absent`] fields are omitted on encode; [`Field::Null`] fields encode as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOpenApiDocument")]
pub struct OpenApiDocument {
    /// OpenAPI specification version string.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub openapi: Field<String>,
    /// Document metadata.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub info: Field<Info>,
    /// Server list.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub servers: Field<Vec<Value>>,
    /// Path items keyed by path template.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub paths: Field<Map<String, Value>>,
    /// Reusable components.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub components: Field<Value>,
    /// Global security requirements.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub security: Field<Vec<Value>>,
    /// Tag definitions.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub tags: Field<Vec<Value>>,
    /// External documentation reference.
    #[serde(rename = "externalDocs", skip_serializing_if = "Field::is_absent")]
    pub external_docs: Field<Value>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// OpenAPI info object.
///
/// # Invariants
/// - `extensions` only holds keys starting with [`EXTENSION_PREFIX`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInfo")]
pub struct Info {
    /// API title.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    /// API version string.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub version: Field<String>,
    /// Description.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    /// Terms of service URL.
    #[serde(rename = "termsOfService", skip_serializing_if = "Field::is_absent")]
    pub terms_of_service: Field<String>,
    /// Contact object.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub contact: Field<Value>,
    /// License object.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub license: Field<Value>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Wire shape for [`OpenApiDocument`] before unknown fields are dropped.
#[derive(Deserialize)]
struct RawOpenApiDocument {
    /// OpenAPI specification version string.
    #[serde(default)]
    openapi: Field<String>,
    /// Document metadata.
    #[serde(default)]
    info: Field<Info>,
    /// Server list.
    #[serde(default)]
    servers: Field<Vec<Value>>,
    /// Path items.
    #[serde(default)]
    paths: Field<Map<String, Value>>,
    /// Reusable components.
    #[serde(default)]
    components: Field<Value>,
    /// Global security requirements.
    #[serde(default)]
    security: Field<Vec<Value>>,
    /// Tag definitions.
    #[serde(default)]
    tags: Field<Vec<Value>>,
    /// External documentation reference.
    #[serde(default, rename = "externalDocs")]
    external_docs: Field<Value>,
    /// Every remaining field.
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl From<RawOpenApiDocument> for OpenApiDocument {
    fn from(raw: RawOpenApiDocument) -> Self {
        Self {
            openapi: raw.openapi,
            info: raw.info,
            servers: raw.servers,
            paths: raw.paths,
            components: raw.components,
            security: raw.security,
            tags: raw.tags,
            external_docs: raw.external_docs,
            extensions: retain_extensions(raw.other),
        }
    }
}

/// Wire shape for [`Info`] before unknown fields are dropped.
#[derive(Deserialize)]
struct RawInfo {
    /// API title.
    #[serde(default)]
    title: Field<String>,
    /// API version string.
    #[serde(default)]
    version: Field<String>,
    /// Description.
    #[serde(default)]
    description: Field<String>,
    /// Terms of service URL.
    #[serde(default, rename = "termsOfService")]
    terms_of_service: Field<String>,
    /// Contact object.
    #[serde(default)]
    contact: Field<Value>,
    /// License object.
    #[serde(default)]
    license: Field<Value>,
    /// Every remaining field.
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl From<RawInfo> for Info {
    fn from(raw: RawInfo) -> Self {
        Self {
            title: raw.title,
            version: raw.version,
            description: raw.description,
            terms_of_service: raw.terms_of_service,
            contact: raw.contact,
            license: raw.license,
            extensions: retain_extensions(raw.other),
        }
    }
}

/// Keeps vendor extension keys and drops everything else.
fn retain_extensions(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.retain(|key, _| key.starts_with(EXTENSION_PREFIX));
    fields
}
