//! Unit tests for text, HTML and structured data bodies.

use crate::message::{
    adapters::regex_patterns::RegexPatterns,
    domain::{
        BlobInput, BodyPart, DataBody, Disposition, HtmlBody, MessageBody, TextBody,
        TextualParts, UTF8_CHARSET,
    },
    error::{UnimplementedError, ValidationError},
};
use rstest::rstest;
use serde_json::json;

use super::fixtures::{STORED_BLOB_ID, patterns, referenced_blob};

// ============================================================================
// Disposition tests
// ============================================================================

#[rstest]
#[case::inline_code(1, Disposition::Inline)]
#[case::attachment_code(2, Disposition::Attachment)]
fn disposition_resolves_codes(#[case] code: i64, #[case] expected: Disposition) {
    assert_eq!(Disposition::from_code(code).expect("legal code"), expected);
    assert_eq!(expected.code(), code);
}

#[rstest]
#[case::inline_label("inline", Disposition::Inline)]
#[case::attachment_label("attachment", Disposition::Attachment)]
fn disposition_parses_legacy_labels(#[case] label: &str, #[case] expected: Disposition) {
    assert_eq!(label.parse::<Disposition>().expect("legal label"), expected);
}

#[rstest]
#[case::code_zero(json!(0))]
#[case::code_three(json!(3))]
#[case::unknown_label(json!("embedded"))]
fn disposition_rejects_unknown_values(#[case] value: serde_json::Value) {
    assert!(serde_json::from_value::<Disposition>(value).is_err());
}

#[test]
fn disposition_serializes_as_code_and_accepts_labels() {
    let encoded = serde_json::to_value(Disposition::Attachment).expect("serialize");
    assert_eq!(encoded, json!(2));

    let decoded: Disposition = serde_json::from_value(json!("inline")).expect("label");
    assert_eq!(decoded, Disposition::Inline);
}

#[test]
fn disposition_defaults_to_inline() {
    assert_eq!(Disposition::default(), Disposition::Inline);
}

// ============================================================================
// Textual body tests
// ============================================================================

#[test]
fn text_body_from_text_pins_utf8_charset() {
    let body = TextBody::from_text("Hello");

    assert_eq!(body.mime_type(), "text/plain");
    assert_eq!(body.content(), Some(&b"Hello"[..]));
    assert_eq!(body.charset(), Some(UTF8_CHARSET));
    assert_eq!(body.disposition(), Disposition::Inline);
    assert!(body.content_id().is_empty());
}

#[test]
fn html_body_reports_html_mime_type() {
    let body = HtmlBody::from_text("<p>Hi</p>");
    assert_eq!(body.mime_type(), "text/html");
}

#[test]
fn textual_body_keeps_supplied_charset() {
    let body = TextBody::from_bytes(vec![0xe9], Some("ISO-8859-1".to_owned()));
    assert_eq!(body.charset(), Some("ISO-8859-1"));
    assert_eq!(body.content(), Some(&[0xe9][..]));
}

#[test]
fn textual_body_rejects_both_content_and_blobs() {
    let parts = TextualParts {
        content: Some(b"inline".to_vec()),
        blobs: vec![BlobInput::from(b"stored".to_vec())],
        ..TextualParts::default()
    };

    let err = TextBody::from_parts(parts).expect_err("content and blobs");
    assert_eq!(err, ValidationError::ContentExclusivity);
}

#[test]
fn textual_body_rejects_neither_content_nor_blobs() {
    let err = HtmlBody::from_parts(TextualParts::default()).expect_err("empty body");
    assert_eq!(err, ValidationError::ContentExclusivity);
}

#[test]
fn textual_body_from_blobs_adapts_raw_bytes() {
    let body = TextBody::from_blobs([
        BlobInput::from(b"part one".to_vec()),
        BlobInput::from(referenced_blob(STORED_BLOB_ID)),
    ])
    .expect("blob body");

    assert!(body.content().is_none());
    assert_eq!(body.blobs().len(), 2);
}

#[test]
fn textual_body_from_blobs_cites_bad_entry() {
    let err = TextBody::from_blobs([BlobInput::Bytes(Vec::new())]).expect_err("empty blob");
    assert!(matches!(err, ValidationError::InvalidBlob { index: 0, .. }));
}

#[test]
fn textual_body_from_empty_blob_list_is_rejected() {
    let err = HtmlBody::from_blobs(Vec::new()).expect_err("no blobs");
    assert_eq!(err, ValidationError::ContentExclusivity);
}

#[rstest]
fn textual_body_validate_checks_blob_ids(patterns: RegexPatterns) {
    let body = TextBody::from_blobs([BlobInput::from(referenced_blob("??"))])
        .expect("structurally valid");

    assert!(body.validate_structure().is_ok());
    let err = body.validate(&patterns).expect_err("bad blob id");
    assert!(matches!(err, ValidationError::InvalidBlob { index: 0, .. }));
}

#[test]
fn with_content_id_rejects_empty_id() {
    let err = TextBody::from_text("x")
        .with_content_id("")
        .expect_err("empty content-id");
    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "contentId"));
}

#[test]
fn with_disposition_replaces_disposition() {
    let body = HtmlBody::from_text("<img>").with_disposition(Disposition::Attachment);
    assert_eq!(body.disposition(), Disposition::Attachment);
}

#[test]
fn html_body_rejects_empty_language() {
    let err = HtmlBody::from_text("<p>Bonjour</p>")
        .with_language(Some(String::new()))
        .expect_err("empty language");
    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "language"));
}

#[rstest]
#[case::absent(None)]
#[case::tagged(Some("fr".to_owned()))]
fn html_body_accepts_absent_or_non_empty_language(#[case] language: Option<String>) {
    let body = HtmlBody::from_text("<p>Bonjour</p>")
        .with_language(language.clone())
        .expect("valid language");
    assert_eq!(body.language(), language.as_deref());
}

#[test]
fn blobify_is_not_implemented() {
    let body = MessageBody::from(TextBody::from_text("inline"));
    assert_eq!(
        body.blobify().expect_err("unfinished capability"),
        UnimplementedError::new("blobify")
    );
}

// ============================================================================
// Data body tests
// ============================================================================

#[rstest]
#[case::json_object(json!({"event": "invite"}), "application/json")]
#[case::array(json!([1, 2, 3]), "application/msgpack")]
#[case::xml(json!({"root": {}}), "application/xml")]
fn data_body_accepts_structured_content(
    #[case] content: serde_json::Value,
    #[case] mime_type: &str,
) {
    let body = DataBody::new(content.clone(), mime_type).expect("valid data body");

    assert_eq!(body.content(), &content);
    assert_eq!(body.mime_type(), mime_type);
    assert_eq!(body.disposition(), Disposition::Attachment);
}

#[rstest]
#[case::string(json!("scalar"))]
#[case::number(json!(42))]
#[case::null(json!(null))]
fn data_body_rejects_scalar_content(#[case] content: serde_json::Value) {
    let err = DataBody::new(content, "application/json").expect_err("scalar content");
    assert!(
        matches!(err, ValidationError::InvalidField { ref field, .. } if field == "data content")
    );
}

#[rstest]
#[case::csv("text/csv")]
#[case::plain("text/plain")]
#[case::empty("")]
fn data_body_rejects_unlisted_mime_types(#[case] mime_type: &str) {
    let err = DataBody::new(json!({}), mime_type).expect_err("unlisted type");
    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "data type"));
}

// ============================================================================
// MessageBody delegation tests
// ============================================================================

#[test]
fn message_body_delegates_to_variant() {
    let data = DataBody::new(json!([]), "application/json")
        .and_then(|body| body.with_content_id("calendar"))
        .expect("valid data body");
    let body = MessageBody::from(data);

    assert_eq!(body.mime_type(), "application/json");
    assert_eq!(body.content_id(), "calendar");
    assert_eq!(body.disposition(), Disposition::Attachment);
    assert!(body.validate_structure().is_ok());
}
