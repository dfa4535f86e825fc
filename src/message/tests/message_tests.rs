//! Unit tests for the message aggregate.

use crate::message::{
    adapters::regex_patterns::RegexPatterns,
    domain::{
        BodyPart, DataBody, EmailAddress, Header, HeaderShape, HeaderValue, HtmlBody, Message,
        MessageAttachment, MessageAttributes, MessageBody, NIL_MESSAGE_UUID, TextBody,
    },
    error::ValidationError,
};
use rstest::{fixture, rstest};
use serde_json::json;

use super::fixtures::{SAMPLE_UUID, address, patterns};

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn message() -> Message {
    Message::new()
}

fn text_with_id(content_id: &str) -> TextBody {
    TextBody::from_text("plain")
        .with_content_id(content_id)
        .expect("valid content-id")
}

fn html_with_id(content_id: &str) -> HtmlBody {
    HtmlBody::from_text("<p>html</p>")
        .with_content_id(content_id)
        .expect("valid content-id")
}

// ============================================================================
// Uuid tests
// ============================================================================

#[rstest]
fn new_message_has_nil_uuid_and_no_content(message: Message) {
    assert_eq!(message.uuid(), NIL_MESSAGE_UUID);
    assert!(message.headers().is_empty());
    assert!(message.body_text().is_none());
    assert!(message.attachments().is_empty());
    assert_eq!(message.folders().count(), 0);
}

#[rstest]
fn set_uuid_accepts_braced_uuid(mut message: Message, patterns: RegexPatterns) {
    message
        .set_uuid(SAMPLE_UUID, &patterns)
        .expect("braced uuid");
    assert_eq!(message.uuid(), SAMPLE_UUID);
}

#[rstest]
#[case::bare("6f9619ff-8b86-d011-b42d-00c04fc964ff")]
#[case::empty("")]
#[case::garbage("{not-a-uuid}")]
fn set_uuid_rejects_malformed_uuid_and_keeps_previous(
    mut message: Message,
    patterns: RegexPatterns,
    #[case] candidate: &str,
) {
    let err = message
        .set_uuid(candidate, &patterns)
        .expect_err("malformed uuid");

    assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "uuid"));
    assert_eq!(message.uuid(), NIL_MESSAGE_UUID);
}

#[rstest]
fn generate_uuid_produces_pattern_conformant_uuid(mut message: Message, patterns: RegexPatterns) {
    let generated = message.generate_uuid().to_owned();

    assert_ne!(generated, NIL_MESSAGE_UUID);
    assert!(message.validate_uuid(&patterns).is_ok());
}

// ============================================================================
// Header setter tests
// ============================================================================

#[rstest]
fn set_header_single_string_replaces_in_place(mut message: Message) {
    let first = message.set_subject("Draft").expect("subject");
    message
        .set_header_single_string("X-Mailer", "missive")
        .expect("arbitrary header");
    let second = message.set_header_single_string("SUBJECT", "Final").expect("subject");

    assert_eq!(first, 0);
    assert_eq!(second, 0);
    assert_eq!(message.subject(), Some("Final"));
    assert_eq!(message.headers().len(), 2);
    assert_eq!(
        message.header("subject").map(Header::value),
        Some(&HeaderValue::Text("Final".to_owned()))
    );
}

#[rstest]
#[case::address("To", HeaderShape::SingleString)]
#[case::string_list("References", HeaderShape::SingleString)]
fn set_header_single_string_rejects_other_shapes(
    mut message: Message,
    #[case] name: &str,
    #[case] expected: HeaderShape,
) {
    let err = message
        .set_header_single_string(name, "value")
        .expect_err("wrong shape");
    assert_eq!(
        err,
        ValidationError::WrongHeaderShape {
            name: name.to_owned(),
            expected,
        }
    );
    assert!(message.headers().is_empty());
}

#[rstest]
fn set_header_with_empty_name_is_rejected(mut message: Message) {
    let err = message
        .set_header_single_string("", "value")
        .expect_err("empty name");
    assert!(matches!(err, ValidationError::InvalidHeader { .. }));
}

#[rstest]
fn set_sender_stores_single_address(mut message: Message) {
    message
        .set_sender(address("Ops", "ops@example.com"))
        .expect("sender");

    assert_eq!(message.sender(), Some(&address("Ops", "ops@example.com")));
}

#[rstest]
fn sender_is_none_when_absent(message: Message) {
    assert!(message.sender().is_none());
}

#[rstest]
fn set_to_deduplicates_by_address(mut message: Message) {
    message
        .set_to(vec![address("A", "a@example.com"), address("B", "a@example.com")])
        .expect("to");

    assert_eq!(message.to(), Some(&[address("B", "a@example.com")][..]));
}

#[rstest]
fn set_to_rejects_empty_list(mut message: Message) {
    let err = message.set_to(Vec::new()).expect_err("no recipients");

    assert!(matches!(err, ValidationError::InvalidHeader { ref name, .. } if name == "To"));
    assert!(!message.has_header("To"));
}

#[rstest]
fn add_to_merges_into_existing_header(mut message: Message) {
    message.set_subject("Agenda").expect("subject");
    let index = message
        .set_to(vec![address("A", "a@example.com")])
        .expect("to");

    let merged = message
        .add_to(vec![
            address("Alice", "a@example.com"),
            address("Bob", "b@example.com"),
        ])
        .expect("merge");

    assert_eq!(index, 1);
    assert_eq!(merged, 1);
    assert_eq!(
        message.to(),
        Some(
            &[
                address("Alice", "a@example.com"),
                address("Bob", "b@example.com"),
            ][..]
        )
    );
}

#[rstest]
fn add_to_address_list_creates_missing_header(mut message: Message) {
    let index = message
        .add_cc(vec![address("", "c@example.com"), address("C", "c@example.com")])
        .expect("cc");

    assert_eq!(index, 0);
    assert_eq!(message.cc(), Some(&[address("C", "c@example.com")][..]));
}

#[rstest]
fn add_to_address_list_needs_addresses_for_missing_header(mut message: Message) {
    let err = message.add_cc(Vec::new()).expect_err("no addresses");

    assert!(matches!(err, ValidationError::InvalidHeader { ref name, .. } if name == "Cc"));
    assert!(message.cc().is_none());
}

#[rstest]
fn add_to_address_list_with_no_addresses_keeps_existing_header(mut message: Message) {
    message.set_cc(vec![address("C", "c@example.com")]).expect("cc");

    let index = message.add_cc(Vec::new()).expect("nothing to merge");

    assert_eq!(index, 0);
    assert_eq!(message.cc(), Some(&[address("C", "c@example.com")][..]));
}

#[rstest]
fn add_to_address_list_rejects_single_address_header(mut message: Message) {
    let err = message
        .add_to_address_list("Sender", vec![address("", "s@example.com")])
        .expect_err("sender is not a list");
    assert!(matches!(
        err,
        ValidationError::WrongHeaderShape { expected: HeaderShape::AddressList, .. }
    ));
}

#[rstest]
fn from_accessors_read_first_address(mut message: Message) {
    message
        .set_from(vec![
            address("Ada", "ada@example.com"),
            address("Bob", "bob@example.com"),
        ])
        .expect("from");

    assert_eq!(message.from_name(), Some("Ada"));
    assert_eq!(message.from_address(), Some("ada@example.com"));
}

#[rstest]
fn set_references_requires_values(mut message: Message) {
    assert!(message.set_references(Vec::new()).is_err());
    assert!(message.references().is_none());

    message
        .set_references(vec!["<a@example.com>".to_owned(), "<b@example.com>".to_owned()])
        .expect("references");
    assert_eq!(message.references().map(<[String]>::len), Some(2));
}

#[rstest]
fn set_headers_normalizes_shapes(mut message: Message) {
    message
        .set_headers(vec![
            Header::new(
                "Sender",
                HeaderValue::TextList(vec!["Ops".to_owned(), "ops@example.com".to_owned()]),
            ),
        ])
        .expect("repairable headers");

    assert_eq!(message.sender(), Some(&address("Ops", "ops@example.com")));
}

#[rstest]
fn set_headers_rejects_empty_address_list(mut message: Message) {
    let err = message
        .set_headers(vec![Header::new("Bcc", HeaderValue::TextList(Vec::new()))])
        .expect_err("empty Bcc");

    assert!(matches!(err, ValidationError::InvalidHeader { ref name, .. } if name == "Bcc"));
    assert!(message.headers().is_empty());
}

#[rstest]
fn set_headers_is_all_or_nothing(mut message: Message) {
    message.set_subject("Kept").expect("subject");

    let result = message.set_headers(vec![
        Header::new("Subject", HeaderValue::Text("Replaced".to_owned())),
        Header::new("References", HeaderValue::TextList(Vec::new())),
    ]);

    assert!(result.is_err());
    assert_eq!(message.subject(), Some("Kept"));
}

// ============================================================================
// Body and content-id tests
// ============================================================================

#[rstest]
fn duplicate_content_id_across_slots_is_rejected(mut message: Message) {
    message.set_body_text(text_with_id("1")).expect("text body");

    let err = message
        .set_body_html(html_with_id("1"))
        .expect_err("duplicate content-id");
    assert_eq!(err, ValidationError::DuplicateContentId("1".to_owned()));
    assert!(message.body_html().is_none());

    message
        .set_body_html(html_with_id("2"))
        .expect("distinct content-id");
    assert_eq!(message.body_html().map(BodyPart::content_id), Some("2"));
}

#[rstest]
fn replacing_a_body_releases_its_content_id(mut message: Message) {
    message.set_body_text(text_with_id("a")).expect("first text");
    message.set_body_text(text_with_id("b")).expect("replacement");

    message
        .set_body_html(html_with_id("a"))
        .expect("released content-id is reusable");
}

#[rstest]
fn replacing_a_body_with_the_same_content_id_is_allowed(mut message: Message) {
    message.set_body_text(text_with_id("a")).expect("first text");
    message.set_body_text(text_with_id("a")).expect("same slot");
}

#[rstest]
fn bodies_without_content_id_get_counter_values(mut message: Message) {
    message.set_plain_text("plain").expect("text body");
    message.set_html_text("<p>html</p>").expect("html body");

    assert_eq!(message.body_text().map(BodyPart::content_id), Some("0"));
    assert_eq!(message.body_html().map(BodyPart::content_id), Some("1"));
}

#[rstest]
fn generated_content_id_can_collide_with_supplied_one(mut message: Message) {
    message.set_body_text(text_with_id("0")).expect("text body");

    let err = message
        .set_html_text("<p>html</p>")
        .expect_err("counter starts at the supplied id");
    assert_eq!(err, ValidationError::DuplicateContentId("0".to_owned()));
}

#[rstest]
fn rejected_replacement_keeps_previous_body(mut message: Message) {
    message.set_body_text(text_with_id("text")).expect("text body");
    message.set_body_html(html_with_id("html")).expect("html body");

    let err = message
        .set_body_text(text_with_id("html"))
        .expect_err("id held by the html slot");

    assert!(matches!(err, ValidationError::DuplicateContentId(_)));
    assert_eq!(message.body_text().map(BodyPart::content_id), Some("text"));
    message
        .set_body(MessageBody::from(text_with_id("fresh")))
        .expect("replacement with a free id");
}

#[rstest]
fn set_body_routes_variant_to_slot(mut message: Message) {
    let data = DataBody::new(json!({"kind": "invite"}), "application/json").expect("data body");

    message.set_body(data.into()).expect("data slot");

    assert!(message.body_data().is_some());
    assert!(message.body_text().is_none());
    assert_eq!(message.bodies().count(), 1);
}

#[rstest]
fn bodies_iterates_in_slot_order(mut message: Message) {
    let data = DataBody::new(json!([]), "application/xml").expect("data body");
    message.set_body_data(data).expect("data");
    message.set_html_text("<p/>").expect("html");
    message.set_plain_text("text").expect("text");

    let types: Vec<&str> = message.bodies().map(BodyPart::mime_type).collect();
    assert_eq!(types, vec!["text/plain", "text/html", "application/xml"]);
}

// ============================================================================
// Attachment tests
// ============================================================================

#[rstest]
fn attachments_keep_insertion_order(mut message: Message) {
    message.add_attachment(MessageAttachment::new("a.txt", "text/plain"));
    message.add_attachment(MessageAttachment::new("b.pdf", "application/pdf"));

    let names: Vec<&str> = message
        .attachments()
        .iter()
        .map(MessageAttachment::name)
        .collect();
    assert_eq!(names, vec!["a.txt", "b.pdf"]);

    message.set_attachments(Vec::new());
    assert!(message.attachments().is_empty());
}

// ============================================================================
// Folder state tests
// ============================================================================

#[rstest]
fn add_folder_keeps_existing_state(mut message: Message) {
    let attributes = MessageAttributes::new().with("seen", "1");
    message.add_folder("INBOX", Some(attributes));

    let state = message.add_folder("INBOX", Some(MessageAttributes::new().with("seen", "0")));

    assert_eq!(state.attributes().get("seen"), Some("1"));
}

#[rstest]
fn add_folder_defaults_to_empty_attributes(mut message: Message) {
    let state = message.add_folder("Archive", None);
    assert!(state.attributes().is_empty());
}

#[rstest]
fn set_folder_replaces_every_folder(mut message: Message) {
    message.add_folder("INBOX", None);
    message.add_folder("Work", None);

    message.set_folder("Archive", Some([("flagged", "yes")].into_iter().collect()));

    let folders: Vec<&str> = message.folders().collect();
    assert_eq!(folders, vec!["Archive"]);
    assert_eq!(
        message
            .folder_state("Archive")
            .and_then(|state| state.attributes().get("flagged")),
        Some("yes")
    );
    assert!(message.folder_state("INBOX").is_none());
}

// ============================================================================
// Builder tests
// ============================================================================

#[test]
fn builder_routes_fields_through_setters() {
    let message = Message::builder()
        .with_headers([
            Header::new("Subject", HeaderValue::Text("Hi".to_owned())),
            Header::new(
                "To",
                HeaderValue::AddressList(vec![
                    address("A", "a@example.com"),
                    address("B", "a@example.com"),
                ]),
            ),
        ])
        .with_body_text(TextBody::from_text("Hello"))
        .with_attachment(MessageAttachment::new("a.txt", "text/plain"))
        .build()
        .expect("valid message");

    assert_eq!(message.subject(), Some("Hi"));
    assert_eq!(message.uuid(), NIL_MESSAGE_UUID);
    assert_eq!(message.body_text().map(BodyPart::content_id), Some("0"));
    assert_eq!(message.attachments().len(), 1);
    assert_eq!(message.to(), Some(&[address("B", "a@example.com")][..]));
}

#[test]
fn builder_rejects_duplicate_content_ids() {
    let result = Message::builder()
        .with_body_text(text_with_id("cid"))
        .with_body_html(html_with_id("cid"))
        .build();

    assert_eq!(
        result.expect_err("duplicate content-id"),
        ValidationError::DuplicateContentId("cid".to_owned())
    );
}

// ============================================================================
// Message::validate tests
// ============================================================================

#[rstest]
fn validate_accepts_lenient_headers(mut message: Message, patterns: RegexPatterns) {
    message
        .set_to(vec![EmailAddress::bare("not an address").expect("non-empty")])
        .expect("lenient header");
    assert!(message.validate(&patterns).is_ok());
}
