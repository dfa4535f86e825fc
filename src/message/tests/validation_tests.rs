//! Unit tests for the validation service and its rules.

use crate::message::{
    adapters::regex_patterns::RegexPatterns,
    domain::{BlobInput, EmailAddress, Message, MessageAttachment, TextBody},
    error::ValidationError,
    ports::{
        patterns::{MockIdentifierPatterns, PatternKind},
        validator::{MessageValidator, ValidationConfig},
    },
    validation::{rules, service::DefaultMessageValidator},
};
use rstest::{fixture, rstest};

use super::fixtures::{STORED_BLOB_ID, address, patterns, referenced_blob};

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn inbound(patterns: RegexPatterns) -> DefaultMessageValidator<RegexPatterns> {
    DefaultMessageValidator::new(patterns)
}

#[fixture]
fn outbound(patterns: RegexPatterns) -> DefaultMessageValidator<RegexPatterns> {
    DefaultMessageValidator::with_config(ValidationConfig::outbound(), patterns)
}

fn message_to(recipient: EmailAddress) -> Message {
    let mut message = Message::new();
    message.set_to(vec![recipient]).expect("lenient recipient");
    message.set_plain_text("body").expect("text body");
    message
}

// ============================================================================
// ValidationConfig tests
// ============================================================================

#[test]
fn default_config_is_inbound() {
    assert_eq!(ValidationConfig::default(), ValidationConfig::inbound());
    assert!(!ValidationConfig::inbound().strict_attachments);
}

#[test]
fn outbound_config_is_strict() {
    let config = ValidationConfig::outbound();
    assert!(config.strict_addresses);
    assert!(config.strict_attachments);
}

#[rstest]
fn validator_exposes_its_config(outbound: DefaultMessageValidator<RegexPatterns>) {
    assert_eq!(outbound.config(), &ValidationConfig::outbound());
}

// ============================================================================
// Service tests with real patterns
// ============================================================================

#[rstest]
fn inbound_accepts_malformed_address(inbound: DefaultMessageValidator<RegexPatterns>) {
    let message = message_to(address("", "undisclosed-recipients"));
    assert!(inbound.validate(&message).is_ok());
}

#[rstest]
fn outbound_rejects_malformed_address(outbound: DefaultMessageValidator<RegexPatterns>) {
    let message = message_to(address("", "undisclosed-recipients"));

    let err = outbound.validate(&message).expect_err("strict addresses");
    assert!(matches!(err, ValidationError::InvalidHeader { ref name, .. } if name == "To"));
}

#[rstest]
fn outbound_accepts_well_formed_message(outbound: DefaultMessageValidator<RegexPatterns>) {
    let mut message = message_to(address("Ada", "ada@example.com"));
    message.generate_uuid();
    message.add_attachment(
        MessageAttachment::new("report.pdf", "application/pdf")
            .with_blob(BlobInput::from(referenced_blob(STORED_BLOB_ID)))
            .expect("valid blob"),
    );

    assert!(outbound.validate(&message).is_ok());
}

#[rstest]
fn outbound_requires_attachment_name(
    inbound: DefaultMessageValidator<RegexPatterns>,
    outbound: DefaultMessageValidator<RegexPatterns>,
) {
    let mut message = message_to(address("Ada", "ada@example.com"));
    message.add_attachment(MessageAttachment::new("", "application/pdf"));

    assert!(inbound.validate(&message).is_ok());
    let err = outbound.validate(&message).expect_err("unnamed attachment");
    assert!(err.to_string().contains("attachment name"));
}

#[rstest]
fn content_validation_checks_body_blob_ids(inbound: DefaultMessageValidator<RegexPatterns>) {
    let mut message = Message::new();
    message
        .set_body_text(
            TextBody::from_blobs([BlobInput::from(referenced_blob("not/a/blob/id"))])
                .expect("structurally valid"),
        )
        .expect("text body");

    assert!(inbound.validate_structure(&message).is_ok());
    let err = inbound
        .validate_content(&message)
        .expect_err("blob id fails pattern");
    assert!(matches!(err, ValidationError::InvalidBlob { index: 0, .. }));
}

#[rstest]
fn content_validation_checks_attachment_blob_ids(
    inbound: DefaultMessageValidator<RegexPatterns>,
) {
    let mut message = Message::new();
    message.add_attachment(
        MessageAttachment::new("a.bin", "application/octet-stream")
            .with_blob(BlobInput::from(b"inline".to_vec()))
            .and_then(|attachment| {
                attachment.with_blob(BlobInput::from(referenced_blob("x")))
            })
            .expect("structurally valid"),
    );

    let err = inbound.validate(&message).expect_err("second blob id");
    assert!(matches!(err, ValidationError::InvalidBlob { index: 1, .. }));
}

#[test]
fn content_id_rule_accepts_distinct_ids() {
    let mut message = Message::new();
    message.set_plain_text("a").expect("text");
    message.set_html_text("<p>b</p>").expect("html");

    assert!(rules::validate_content_ids(&message).is_ok());
}

// ============================================================================
// Service tests with mocked patterns
// ============================================================================

#[test]
fn uuid_failure_reports_configured_pattern() {
    let mut patterns = MockIdentifierPatterns::new();
    patterns
        .expect_matches()
        .times(1)
        .returning(|_, _| false);
    patterns
        .expect_pattern()
        .times(1)
        .returning(|_| "^mock-uuid$".to_owned());
    let validator = DefaultMessageValidator::new(patterns);

    let err = validator
        .validate(&Message::new())
        .expect_err("uuid rejected by pattern");

    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "uuid"));
    assert!(err.to_string().contains("^mock-uuid$"));
}

#[test]
fn lenient_validation_never_consults_address_pattern() {
    let mut patterns = MockIdentifierPatterns::new();
    patterns
        .expect_matches()
        .times(1)
        .returning(|kind, _| kind == PatternKind::Uuid);
    patterns.expect_pattern().never();
    let validator = DefaultMessageValidator::new(patterns);

    let message = message_to(address("", "anything"));
    assert!(validator.validate(&message).is_ok());
}

#[test]
fn strict_validation_consults_address_pattern_per_address() {
    let mut patterns = MockIdentifierPatterns::new();
    patterns.expect_matches().times(3).returning(|_, _| true);
    let validator = DefaultMessageValidator::with_config(ValidationConfig::outbound(), patterns);

    let mut message = message_to(address("Ada", "ada@example.com"));
    message
        .add_to(vec![address("Bob", "bob@example.com")])
        .expect("second recipient");

    assert!(validator.validate(&message).is_ok());
}

#[test]
fn structure_validation_stops_at_first_failure() {
    let mut patterns = MockIdentifierPatterns::new();
    patterns
        .expect_matches()
        .times(1)
        .returning(|kind, _| kind != PatternKind::Uuid);
    patterns
        .expect_pattern()
        .returning(|kind| format!("<{}>", kind.label()));
    let validator = DefaultMessageValidator::with_config(ValidationConfig::outbound(), patterns);

    let message = message_to(address("", "not checked"));
    let err = validator.validate(&message).expect_err("uuid fails first");
    assert!(err.to_string().contains("<uuid>"));
}
