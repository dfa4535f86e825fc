//! Error types for message validation, lookups and serialization.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::HeaderShape;
use thiserror::Error;

/// Errors raised when an entity field violates its documented invariant.
///
/// Validation is fail-fast: the first violation is reported and the
/// mutation that triggered it is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field holds a value outside its documented shape.
    #[error("invalid {field} value '{value}': must be {expected}")]
    InvalidField {
        /// The offending field.
        field: String,
        /// The rejected value, rendered for diagnostics.
        value: String,
        /// The expected shape or pattern.
        expected: String,
    },

    /// A transform mapping used a key outside the legal key set.
    #[error("invalid transform key '{0}': must be one of [0,1,2,3,5,6]")]
    InvalidTransformKey(i64),

    /// An inline blob carried referenced-blob metadata.
    #[error("inline blob must have empty id/sizes/digests (found a non-empty {field})")]
    InlineBlobNotEmpty {
        /// The metadata field that was not empty.
        field: &'static str,
    },

    /// A digest does not have the byte length fixed by its algorithm.
    #[error(
        "invalid digest size {actual} for algorithm {algorithm} under compression {compression}: \
         expected {expected} bytes"
    )]
    DigestLength {
        /// The compression method code owning the digest.
        compression: i64,
        /// The digest algorithm code.
        algorithm: i64,
        /// The length of the supplied digest.
        actual: usize,
        /// The length required by the algorithm.
        expected: usize,
    },

    /// A body had both or neither of inline content and blobs.
    #[error("exactly one of content or blobs must be set")]
    ContentExclusivity,

    /// An entry of a blob list failed validation.
    #[error("invalid blob at index {index}: {source}")]
    InvalidBlob {
        /// Position of the offending blob.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<Self>,
    },

    /// A body content-id is already registered on the message.
    #[error("Content-Id must be unique within the message (duplicate '{0}')")]
    DuplicateContentId(String),

    /// A header entry is malformed.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as supplied.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// A shape-specific header operation targeted a header of another shape.
    #[error("header '{name}' does not have the {expected} shape")]
    WrongHeaderShape {
        /// The header name as supplied.
        name: String,
        /// The shape class the operation requires.
        expected: HeaderShape,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Creates an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an error raised by the blob at `index` of a blob list.
    #[must_use]
    pub fn at_blob(index: usize, source: Self) -> Self {
        Self::InvalidBlob {
            index,
            source: Box::new(source),
        }
    }
}

/// Errors raised by external lookup collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The queried entity does not exist.
    #[error("query returned nothing for '{id}'{}", describe_type(.expected_type.as_deref()))]
    NotFound {
        /// The queried identifier.
        id: String,
        /// The kind of entity that was expected, when known.
        expected_type: Option<String>,
    },

    /// Blob content could not be read.
    #[error("blob data could not be read for '{blob_id}': [{code}] {text}")]
    BlobRead {
        /// The blob that failed to read.
        blob_id: String,
        /// Failure code reported by the reader.
        code: i32,
        /// Failure description reported by the reader.
        text: String,
    },
}

fn describe_type(expected_type: Option<&str>) -> String {
    expected_type.map_or_else(String::new, |kind| format!(" (expected {kind})"))
}

impl LookupError {
    /// Creates a not-found error for an untyped lookup.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            id: id.into(),
            expected_type: None,
        }
    }

    /// Creates a not-found error naming the expected entity type.
    #[must_use]
    pub fn not_found_of_type(id: impl Into<String>, expected_type: impl Into<String>) -> Self {
        Self::NotFound {
            id: id.into(),
            expected_type: Some(expected_type.into()),
        }
    }

    /// Creates a blob read error.
    #[must_use]
    pub fn blob_read(blob_id: impl Into<String>, code: i32, text: impl Into<String>) -> Self {
        Self::BlobRead {
            blob_id: blob_id.into(),
            code,
            text: text.into(),
        }
    }
}

/// An intentionally unfinished capability was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{capability} is not implemented")]
pub struct UnimplementedError {
    /// Name of the capability.
    pub capability: &'static str,
}

impl UnimplementedError {
    /// Creates an error for the named capability.
    #[must_use]
    pub const fn new(capability: &'static str) -> Self {
        Self { capability }
    }
}

/// Errors raised while producing or decoding a serialized form.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The descriptive (JSON tree) form could not be built or read.
    #[error("descriptive form error: {0}")]
    Descriptive(#[from] serde_json::Error),

    /// The compact form could not be encoded.
    #[error("compact encode error: {0}")]
    CompactEncode(#[from] rmp_serde::encode::Error),

    /// The compact form could not be decoded.
    #[error("compact decode error: {0}")]
    CompactDecode(#[from] rmp_serde::decode::Error),

    /// A decoded entity violated its invariants.
    #[error("decoded entity is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configured identifier pattern could not be compiled.
#[derive(Debug, Clone, Error)]
#[error("invalid {kind} pattern: {source}")]
pub struct PatternError {
    /// Which pattern failed.
    pub kind: &'static str,
    /// The underlying regex error.
    #[source]
    pub source: regex::Error,
}
