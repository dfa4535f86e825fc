//! Unit tests for blob transform descriptors.

use std::collections::BTreeMap;

use crate::message::{
    domain::{BlobTransform, NewlineRun, TransformEncoding, TransformKey, TransformPayload, Transforms},
    error::ValidationError,
};
use rstest::rstest;

// ============================================================================
// TransformKey tests
// ============================================================================

#[rstest]
#[case::offset(0, TransformKey::Offset)]
#[case::length(1, TransformKey::Length)]
#[case::encoding(2, TransformKey::Encoding)]
#[case::newline_n(3, TransformKey::NewlineN)]
#[case::newline_rn(5, TransformKey::NewlineRn)]
#[case::charset(6, TransformKey::Charset)]
fn transform_key_resolves_legal_codes(#[case] code: i64, #[case] expected: TransformKey) {
    let key = TransformKey::from_code(code).expect("legal key");
    assert_eq!(key, expected);
    assert_eq!(key.code(), code);
}

#[rstest]
#[case::gap(4)]
#[case::negative(-1)]
#[case::above_range(7)]
fn transform_key_rejects_unknown_codes(#[case] code: i64) {
    let err = TransformKey::from_code(code).expect_err("unknown key");
    assert_eq!(err, ValidationError::InvalidTransformKey(code));
}

// ============================================================================
// BlobTransform validation tests
// ============================================================================

#[rstest]
#[case::single_run(vec![NewlineRun::new(2, 2)])]
#[case::several_runs(vec![NewlineRun::new(76, 40), NewlineRun::new(12, 3)])]
fn newline_runs_above_one_are_accepted(#[case] runs: Vec<NewlineRun>) {
    assert!(BlobTransform::NewlineN(runs.clone()).validate().is_ok());
    assert!(BlobTransform::NewlineRn(runs).validate().is_ok());
}

#[rstest]
#[case::byte_count_of_one(vec![NewlineRun::new(1, 2)])]
#[case::repeat_count_of_one(vec![NewlineRun::new(2, 1)])]
#[case::zero_entry(vec![NewlineRun::new(0, 0)])]
#[case::empty(Vec::new())]
fn newline_runs_must_be_non_empty_and_above_one(#[case] runs: Vec<NewlineRun>) {
    let err = BlobTransform::NewlineN(runs)
        .validate()
        .expect_err("invalid runs");
    assert!(matches!(err, ValidationError::InvalidField { .. }));
}

#[rstest]
#[case::offset(BlobTransform::Offset(-1))]
#[case::length(BlobTransform::Length(-5))]
#[case::one_char_charset(BlobTransform::Charset("u".to_owned()))]
#[case::empty_charset(BlobTransform::Charset(String::new()))]
fn transform_rules_reject_invalid_payloads(#[case] transform: BlobTransform) {
    assert!(transform.validate().is_err());
}

#[rstest]
#[case::zero_offset(BlobTransform::Offset(0))]
#[case::length(BlobTransform::Length(1024))]
#[case::base64(BlobTransform::Encoding(TransformEncoding::Base64))]
#[case::charset(BlobTransform::Charset("UTF-8".to_owned()))]
fn transform_rules_accept_valid_payloads(#[case] transform: BlobTransform) {
    assert!(transform.validate().is_ok());
}

// ============================================================================
// Payload coercion tests
// ============================================================================

#[test]
fn from_payload_coerces_encoding_code() {
    let transform =
        BlobTransform::from_payload(TransformKey::Encoding, &TransformPayload::Integer(1))
            .expect("base64 code");
    assert_eq!(transform, BlobTransform::Encoding(TransformEncoding::Base64));
}

#[test]
fn from_payload_rejects_unknown_encoding_code() {
    let err = BlobTransform::from_payload(TransformKey::Encoding, &TransformPayload::Integer(9))
        .expect_err("unknown encoding");
    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "encoding"));
}

#[test]
fn from_payload_rejects_payload_of_wrong_shape() {
    let err = BlobTransform::from_payload(
        TransformKey::Charset,
        &TransformPayload::Integer(8),
    )
    .expect_err("charset needs a string");
    assert!(matches!(err, ValidationError::InvalidField { .. }));
}

#[test]
fn from_payload_rejects_runs_that_are_not_pairs() {
    let err = BlobTransform::from_payload(
        TransformKey::NewlineRn,
        &TransformPayload::Runs(vec![vec![2, 2, 2]]),
    )
    .expect_err("triple is not a pair");
    assert!(err.to_string().contains("a pair of integers"));
}

#[test]
fn to_payload_renders_runs_as_pairs() {
    let transform = BlobTransform::NewlineN(vec![NewlineRun::new(76, 12)]);
    assert_eq!(
        transform.to_payload(),
        TransformPayload::Runs(vec![vec![76, 12]])
    );
}

// ============================================================================
// Transforms pipeline tests
// ============================================================================

#[test]
fn transforms_from_raw_builds_pipeline_in_key_order() {
    let raw = BTreeMap::from([
        (6, TransformPayload::Text("ISO-8859-1".to_owned())),
        (0, TransformPayload::Integer(10)),
        (1, TransformPayload::Integer(20)),
    ]);

    let transforms = Transforms::from_raw(raw.clone()).expect("valid pipeline");

    let keys: Vec<TransformKey> = transforms.iter().map(BlobTransform::key).collect();
    assert_eq!(
        keys,
        vec![TransformKey::Offset, TransformKey::Length, TransformKey::Charset]
    );
    assert_eq!(transforms.to_raw(), raw);
}

#[test]
fn transforms_from_raw_rejects_key_four() {
    let raw = [(4, TransformPayload::Integer(1))];
    let err = Transforms::from_raw(raw).expect_err("key 4 is not legal");
    assert_eq!(err, ValidationError::InvalidTransformKey(4));
}

#[test]
fn transforms_with_replaces_same_key() {
    let transforms = Transforms::new()
        .with(BlobTransform::Offset(4))
        .and_then(|pipeline| pipeline.with(BlobTransform::Offset(8)))
        .expect("valid offsets");

    assert_eq!(transforms.len(), 1);
    assert_eq!(
        transforms.get(TransformKey::Offset),
        Some(&BlobTransform::Offset(8))
    );
}

#[test]
fn transforms_with_leaves_pipeline_unchanged_on_error() {
    let transforms = Transforms::new()
        .with(BlobTransform::Length(3))
        .expect("valid length");

    let result = transforms.clone().with(BlobTransform::Offset(-1));

    assert!(result.is_err());
    assert_eq!(transforms.len(), 1);
    assert!(transforms.get(TransformKey::Offset).is_none());
}
