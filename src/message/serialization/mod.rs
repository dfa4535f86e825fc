//! Serialized forms of message entities.
//!
//! Two independent representations are produced from validated entities:
//!
//! - [`Descriptive`]: a keyed JSON tree meant for inspection
//! - [`Compact`]: a MessagePack encoding that prefers positional arrays
//!
//! Folder state is never serialized. Decoding re-runs the structural
//! validation of every entity and the header taxonomy normalization.

pub mod compact;
pub mod descriptive;

pub use compact::{
    Compact, CompactAttachment, CompactBlob, CompactDataBody, CompactMessage, CompactTextualBody,
};
pub use descriptive::{
    Descriptive, DescriptiveAttachment, DescriptiveBlob, DescriptiveDataBody, DescriptiveMessage,
    DescriptiveReference, DescriptiveTextualBody,
};

use crate::message::{
    domain::{Blob, BlobInput, Disposition},
    error::ValidationError,
};

/// Converts serialized blob entries, citing the index of a failing entry.
fn decode_blobs<F>(
    forms: Vec<F>,
    decode: impl Fn(F) -> Result<Blob, ValidationError>,
) -> Result<Vec<BlobInput>, ValidationError> {
    forms
        .into_iter()
        .enumerate()
        .map(|(index, form)| {
            decode(form)
                .map(BlobInput::Blob)
                .map_err(|source| ValidationError::at_blob(index, source))
        })
        .collect()
}

fn expect_type(actual: &str, expected: &str) -> Result<(), ValidationError> {
    if actual == expected {
        return Ok(());
    }
    Err(ValidationError::invalid_field(
        "type",
        actual,
        format!("'{expected}'"),
    ))
}

fn expect_attachment_disposition(disposition: Disposition) -> Result<(), ValidationError> {
    if disposition == Disposition::Attachment {
        return Ok(());
    }
    Err(ValidationError::invalid_field(
        "disposition",
        disposition.code(),
        "2 (attachment) for data bodies",
    ))
}
