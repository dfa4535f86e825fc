//! Domain types for the message subsystem.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! Entities validate on construction and on every mutation; collaborators
//! such as identifier patterns are passed in explicitly.

mod address;
mod attachment;
mod blob;
mod body;
mod folder;
mod header;
mod ids;
mod message;
mod transform;

pub use address::EmailAddress;
pub use attachment::{AttachmentParts, DEFAULT_ATTACHMENT_TYPE, MessageAttachment};
pub use blob::{
    Blob, BlobInput, BlobParts, Compression, DigestAlgorithm, DigestTable, MAX_BLOB_SIZE,
    SizeTable, adapt_blobs, validate_blobs,
};
pub use body::{
    BodyPart, DATA_MIME_TYPES, DataBody, Disposition, HTML_MIME_TYPE, HtmlBody, MessageBody,
    TEXT_MIME_TYPE, TextBody, TextualBody, TextualParts, UTF8_CHARSET,
};
pub use folder::{FolderState, MessageAttributes};
pub use header::{
    Header, HeaderShape, HeaderValidation, HeaderValue, dedup_addresses, merge_addresses,
};
pub use ids::{ContentIdRegistry, NIL_MESSAGE_UUID, generate_message_uuid};
pub use message::{Message, MessageBuilder};
pub use transform::{
    BlobTransform, NewlineRun, TransformEncoding, TransformKey, TransformPayload, Transforms,
};
