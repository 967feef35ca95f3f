// crates/openapi-conformance-core/src/runtime/codec.rs
// ============================================================================
// Module: Wire Codecs
// Description: Encode/decode documents through the discovery wire format.
// Purpose: Model the serialize/deserialize boundary documents cross in clients.
// Dependencies: serde, serde_json, thiserror, crate::core
// ============================================================================

//! ## Overview
//! A [`WireCodec`] turns a [`Document`] into wire bytes and back. Encoding is
//! always plain JSON; decoding goes through a decoder schema `T`, the typed
//! shape a client materializes. [`JsonCodec`] uses the JSON data model itself
//! and is lossless. [`OpenApiV3Codec`] decodes through [`OpenApiDocument`]
//! and loses anything that model does not carry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::core::Document;
use crate::core::OpenApiDocument;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Codec errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Serializing the document failed.
    #[error("{codec} encode failed: {message}")]
    Encode {
        /// Codec name.
        codec: &'static str,
        /// Underlying error message.
        message: String,
    },
    /// Deserializing the bytes failed.
    #[error("{codec} decode failed: {message}")]
    Decode {
        /// Codec name.
        codec: &'static str,
        /// Underlying error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Codec Trait
// ============================================================================

/// Serialization boundary between the discovery wire and a client model.
pub trait WireCodec: Send + Sync {
    /// Returns a stable codec name for diagnostics.
    fn name(&self) -> &'static str;

    /// Encodes a document into wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] when serialization fails.
    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError>;

    /// Decodes wire bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] when the bytes do not fit the decoder schema.
    fn decode(&self, bytes: &[u8]) -> Result<Document, CodecError>;
}

// ============================================================================
// SECTION: Schema Codec
// ============================================================================

/// Codec that decodes through the typed schema `T`.
///
/// # Invariants
/// - Stateless; safe to share across concurrently running scenarios.
pub struct SchemaCodec<T> {
    /// Codec name reported in diagnostics.
    name: &'static str,
    /// Decoder schema marker.
    schema: PhantomData<fn() -> T>,
}

impl<T> SchemaCodec<T> {
    /// Creates a codec with the given diagnostic name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            schema: PhantomData,
        }
    }
}

impl<T> WireCodec for SchemaCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(document).map_err(|err| CodecError::Encode {
            codec: self.name,
            message: err.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let decode_error = |message: String| CodecError::Decode {
            codec: self.name,
            message,
        };
        let typed: T = serde_json::from_slice(bytes).map_err(|err| decode_error(err.to_string()))?;
        let value = serde_json::to_value(typed).map_err(|err| decode_error(err.to_string()))?;
        Ok(Document::new(value))
    }
}

/// Codec over the JSON data model; never drops information.
pub type JsonCodec = SchemaCodec<Value>;

/// Codec over the typed OpenAPI v3 document model.
pub type OpenApiV3Codec = SchemaCodec<OpenApiDocument>;

/// Returns the lossless JSON codec.
#[must_use]
pub const fn json_codec() -> JsonCodec {
    SchemaCodec::named("json")
}

/// Returns the OpenAPI v3 schema codec.
#[must_use]
pub const fn openapi_v3_codec() -> OpenApiV3Codec {
    SchemaCodec::named("openapi_v3")
}

// ============================================================================
// SECTION: Codec Selection
// ============================================================================

/// Selectable codec kinds.
///
/// # Invariants
/// - Variants are stable for configuration parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// Lossless JSON data model.
    Json,
    /// Typed OpenAPI v3 decoder schema.
    #[default]
    #[serde(rename = "openapi_v3")]
    OpenApiV3,
}

impl CodecKind {
    /// Builds a shareable codec for this kind.
    #[must_use]
    pub fn build(self) -> Arc<dyn WireCodec> {
        match self {
            Self::Json => Arc::new(json_codec()),
            Self::OpenApiV3 => Arc::new(openapi_v3_codec()),
        }
    }
}
