//! Unit tests for the pattern and blob store adapters.

use crate::message::{
    adapters::{
        memory::{InMemoryBlobStore, READ_FAILURE_WINDOW},
        regex_patterns::{DEFAULT_ADDRESS_PATTERN, PatternConfig, RegexPatterns},
    },
    domain::{Blob, TransformPayload},
    error::LookupError,
    ports::{
        blob_reader::BlobReader,
        patterns::{IdentifierPatterns, PatternKind},
    },
};
use rstest::{fixture, rstest};

use super::fixtures::{SAMPLE_UUID, STORED_BLOB_ID, patterns};

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn store() -> InMemoryBlobStore {
    let store = InMemoryBlobStore::new();
    store
        .insert(STORED_BLOB_ID, b"0123456789".to_vec())
        .expect("insert should succeed");
    store
}

fn windowed(offset: i64, length: i64) -> Blob {
    Blob::referenced(STORED_BLOB_ID)
        .with_raw_transforms([
            (0, TransformPayload::Integer(offset)),
            (1, TransformPayload::Integer(length)),
        ])
        .expect("valid window")
}

// ============================================================================
// RegexPatterns tests
// ============================================================================

#[rstest]
#[case::uuid(PatternKind::Uuid, SAMPLE_UUID, true)]
#[case::unbraced_uuid(PatternKind::Uuid, "6f9619ff-8b86-d011-b42d-00c04fc964ff", false)]
#[case::blob_id(PatternKind::BlobId, STORED_BLOB_ID, true)]
#[case::short_blob_id(PatternKind::BlobId, "abc", false)]
#[case::address(PatternKind::Address, "ada@example.com", true)]
#[case::bracketed_address(PatternKind::Address, "<ada@example.com>", false)]
fn standard_patterns_classify_identifiers(
    patterns: RegexPatterns,
    #[case] kind: PatternKind,
    #[case] value: &str,
    #[case] expected: bool,
) {
    assert_eq!(patterns.matches(kind, value), expected);
}

#[rstest]
fn pattern_source_is_reported(patterns: RegexPatterns) {
    assert_eq!(patterns.pattern(PatternKind::Address), DEFAULT_ADDRESS_PATTERN);
}

#[test]
fn custom_config_overrides_one_pattern() {
    let config: PatternConfig =
        serde_json::from_str(r#"{"blob_id": "^[a-f0-9]{40}$"}"#).expect("valid config");
    let patterns = RegexPatterns::new(&config).expect("compiles");

    assert!(patterns.matches(PatternKind::BlobId, &"a".repeat(40)));
    assert!(!patterns.matches(PatternKind::BlobId, STORED_BLOB_ID));
    assert!(patterns.matches(PatternKind::Uuid, SAMPLE_UUID));
}

#[test]
fn invalid_pattern_names_its_kind() {
    let config = PatternConfig {
        uuid: "(".to_owned(),
        ..PatternConfig::default()
    };

    let err = RegexPatterns::new(&config).expect_err("unbalanced group");
    assert_eq!(err.kind, "uuid");
    assert!(err.to_string().starts_with("invalid uuid pattern"));
}

// ============================================================================
// InMemoryBlobStore tests
// ============================================================================

#[test]
fn new_store_is_empty() {
    let store = InMemoryBlobStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[rstest]
fn read_inline_blob_returns_its_bytes(store: InMemoryBlobStore) {
    let blob = Blob::inline(b"inline".to_vec()).expect("inline blob");
    assert_eq!(store.read(&blob).expect("inline read"), b"inline".to_vec());
}

#[rstest]
fn read_referenced_blob_returns_stored_bytes(store: InMemoryBlobStore) {
    let blob = Blob::referenced(STORED_BLOB_ID);
    assert_eq!(store.read(&blob).expect("stored"), b"0123456789".to_vec());
    assert_eq!(store.len(), 1);
}

#[rstest]
fn read_applies_offset_and_length(store: InMemoryBlobStore) {
    assert_eq!(store.read(&windowed(2, 3)).expect("window"), b"234".to_vec());
}

#[rstest]
fn read_with_offset_only_returns_tail(store: InMemoryBlobStore) {
    let blob = Blob::referenced(STORED_BLOB_ID)
        .with_raw_transforms([(0, TransformPayload::Integer(7))])
        .expect("valid offset");
    assert_eq!(store.read(&blob).expect("tail"), b"789".to_vec());
}

#[rstest]
#[case::offset_past_end(11, 0)]
#[case::length_past_end(8, 5)]
fn read_outside_stored_bytes_fails(
    store: InMemoryBlobStore,
    #[case] offset: i64,
    #[case] length: i64,
) {
    let err = store.read(&windowed(offset, length)).expect_err("window");
    assert!(matches!(
        err,
        LookupError::BlobRead { code: READ_FAILURE_WINDOW, .. }
    ));
}

#[rstest]
fn read_unknown_blob_is_not_found(store: InMemoryBlobStore) {
    let err = store
        .read(&Blob::referenced("MissingBlobIdentifier"))
        .expect_err("unknown id");
    assert_eq!(
        err,
        LookupError::not_found_of_type("MissingBlobIdentifier", "Blob")
    );
}

#[rstest]
fn insert_replaces_existing_content(store: InMemoryBlobStore) {
    store
        .insert(STORED_BLOB_ID, b"replaced".to_vec())
        .expect("insert");

    assert_eq!(store.len(), 1);
    assert_eq!(
        store.read(&Blob::referenced(STORED_BLOB_ID)).expect("stored"),
        b"replaced".to_vec()
    );
}

#[rstest]
fn cloned_store_shares_content(store: InMemoryBlobStore) {
    let clone = store.clone();
    clone
        .insert("U2Vjb25kU3RvcmVkQmxvYg", b"second".to_vec())
        .expect("insert");

    assert_eq!(store.len(), 2);
}
