// crates/openapi-conformance-core/tests/roundtrip.rs
// ============================================================================
// Module: Round-Trip Checker Tests
// Description: Verifies pass and mismatch verdicts for each codec.
// ============================================================================
//! ## Overview
//! Validates that lossless documents pass, that schema drift and corrupting
//! codecs are reported with the differing path, and that codec failures
//! surface as transport errors.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use openapi_conformance_core::DiffKind;
use openapi_conformance_core::Document;
use openapi_conformance_core::Field;
use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::OpenApiDocument;
use openapi_conformance_core::Verdict;
use openapi_conformance_core::VerdictKind;
use openapi_conformance_core::runtime::CodecError;
use openapi_conformance_core::runtime::CodecKind;
use openapi_conformance_core::runtime::ComparisonMode;
use openapi_conformance_core::runtime::RoundTripChecker;
use openapi_conformance_core::runtime::WireCodec;
use openapi_conformance_core::runtime::json_codec;
use openapi_conformance_core::runtime::openapi_v3_codec;
use serde_json::Value;
use serde_json::json;

use crate::common::drifted_document;
use crate::common::sample_document;

/// Codec that rewrites `info.version` on decode.
struct CorruptingCodec;

impl WireCodec for CorruptingCodec {
    fn name(&self) -> &'static str {
        "corrupting"
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        json_codec().encode(document)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let mut value = json_codec().decode(bytes)?.into_value();
        value["info"]["version"] = json!("tampered");
        Ok(Document::new(value))
    }
}

/// Codec whose decoder always fails.
struct BrokenDecoder;

impl WireCodec for BrokenDecoder {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        json_codec().encode(document)
    }

    fn decode(&self, _bytes: &[u8]) -> Result<Document, CodecError> {
        Err(CodecError::Decode {
            codec: "broken",
            message: "unexpected end of input".to_string(),
        })
    }
}

fn adversarial_documents() -> Vec<Value> {
    vec![
        json!({}),
        json!({"openapi": null}),
        json!({"openapi": "3.0.0", "servers": null, "paths": null, "components": null}),
        json!({"openapi": "3.0.0", "security": null, "tags": null, "externalDocs": null}),
        json!({"openapi": "3.0.0", "info": null}),
        json!({"openapi": "3.0.0", "info": {}}),
        json!({"openapi": "3.0.0", "info": {"title": "t", "version": null, "description": null}}),
        json!({"openapi": "3.0.0", "paths": {}}),
        json!({"openapi": "3.0.0", "paths": {"/a": {}, "/a/": {}, "/A": {}}}),
        json!({"openapi": "3.0.0", "components": {"schemas": {"x": [[[[[[[[[]]]]]]]]]}}}),
        json!({"openapi": "3.0.0", "paths": {"/n": {"x-null": null, "items": [null, {}, []]}}}),
        json!({"openapi": "3.0.0", "info": {"title": "", "version": ""}, "tags": []}),
        json!({"openapi": "3.0.0", "x-": 1, "x-x": {"x-y": "\u{0}\u{ffff}"}}),
        json!({"openapi": "3.0.0", "paths": {"/emoji/\u{1f600}": {"get": {"summary": "a~b/c"}}}}),
    ]
}

#[test]
fn json_codec_round_trips_adversarial_documents() {
    let checker = RoundTripChecker::new(Arc::new(json_codec()));
    for value in adversarial_documents() {
        let verdict = checker.verify(&Document::new(value.clone()));
        assert_eq!(verdict, Verdict::Pass, "document {value}");
    }
}

#[test]
fn openapi_codec_round_trips_adversarial_documents() {
    let checker = RoundTripChecker::new(CodecKind::OpenApiV3.build());
    for value in adversarial_documents() {
        let verdict = checker.verify(&Document::new(value.clone()));
        assert_eq!(verdict, Verdict::Pass, "document {value}");
    }
}

#[test]
fn openapi_codec_reaches_encoded_fixpoint_on_adversarial_documents() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()))
        .with_comparison(ComparisonMode::EncodedFixpoint);
    for value in adversarial_documents() {
        let verdict = checker.verify(&Document::new(value.clone()));
        assert_eq!(verdict, Verdict::Pass, "document {value}");
    }
}

#[test]
fn openapi_codec_preserves_extensions_and_known_fields() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let document = sample_document(&GroupVersion::new("apps", "v1"));
    assert_eq!(checker.verify(&document), Verdict::Pass);
}

#[test]
fn schema_drift_is_reported_as_missing_field() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let document = drifted_document(&GroupVersion::new("batch", "v1"));
    let Verdict::RoundTripMismatch {
        diff,
    } = checker.verify(&document)
    else {
        panic!("expected mismatch");
    };
    assert_eq!(diff.entries.len(), 1);
    assert_eq!(diff.entries[0].path, "/webhooks");
    assert_eq!(diff.entries[0].kind, DiffKind::Missing);
    assert_eq!(diff.entries[0].actual, None);
}

#[test]
fn unknown_info_field_is_reported_at_nested_path() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let document = Document::new(json!({
        "openapi": "3.1.0",
        "info": {"title": "t", "version": "v", "summary": "dropped", "x-kept": true}
    }));
    let Verdict::RoundTripMismatch {
        diff,
    } = checker.verify(&document)
    else {
        panic!("expected mismatch");
    };
    let paths: Vec<&str> = diff.entries.iter().map(|entry| entry.path.as_str()).collect();
    assert_eq!(paths, vec!["/info/summary"]);
}

#[test]
fn explicit_null_survives_schema_codec() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let document = Document::new(json!({
        "openapi": "3.0.0",
        "servers": null,
        "info": {"title": "t", "version": "v", "description": null}
    }));
    assert_eq!(checker.verify(&document), Verdict::Pass);
}

#[test]
fn schema_model_keeps_null_distinct_from_absent() {
    let decoded: OpenApiDocument =
        serde_json::from_value(json!({"openapi": "3.0.0", "servers": null})).unwrap();
    assert_eq!(decoded.openapi, Field::Value("3.0.0".to_string()));
    assert_eq!(decoded.servers, Field::Null);
    assert_eq!(decoded.paths, Field::Absent);
    assert_eq!(
        serde_json::to_value(&decoded).unwrap(),
        json!({"openapi": "3.0.0", "servers": null})
    );
}

#[test]
fn corrupting_codec_names_the_altered_path() {
    let checker = RoundTripChecker::new(Arc::new(CorruptingCodec));
    let document = sample_document(&GroupVersion::new("policy", "v1"));
    let Verdict::RoundTripMismatch {
        diff,
    } = checker.verify(&document)
    else {
        panic!("expected mismatch");
    };
    assert_eq!(diff.entries.len(), 1);
    let entry = &diff.entries[0];
    assert_eq!(entry.path, "/info/version");
    assert_eq!(entry.kind, DiffKind::Changed);
    assert_eq!(entry.expected, Some(json!("policy/v1")));
    assert_eq!(entry.actual, Some(json!("tampered")));
}

#[test]
fn decoder_failure_is_a_transport_error() {
    let checker = RoundTripChecker::new(Arc::new(BrokenDecoder));
    let verdict = checker.verify(&sample_document(&GroupVersion::core("v1")));
    let Verdict::TransportError {
        cause,
    } = verdict
    else {
        panic!("expected transport error");
    };
    assert!(cause.contains("broken decode failed"));
}

#[test]
fn document_outside_decoder_schema_is_a_structural_diff() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let Verdict::RoundTripMismatch {
        diff,
    } = checker.verify(&Document::new(json!({"swagger": "2.0"})))
    else {
        panic!("expected mismatch");
    };
    assert_eq!(diff.entries.len(), 1);
    assert_eq!(diff.entries[0].path, "/swagger");
    assert_eq!(diff.entries[0].kind, DiffKind::Missing);
}

#[test]
fn non_object_document_is_a_transport_error() {
    let checker = RoundTripChecker::new(Arc::new(openapi_v3_codec()));
    let verdict = checker.verify(&Document::new(json!(["openapi", "3.0.0"])));
    assert_eq!(verdict.kind(), VerdictKind::TransportError);
}
