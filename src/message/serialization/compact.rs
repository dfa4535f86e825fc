//! Compact form: MessagePack with positional arrays.
//!
//! Records are encoded as arrays in field order; tables keep their integer
//! keys. A referenced blob is `[id, sizes, digests]`, or
//! `[id, sizes, digests, transforms]` when it has transforms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_bytes::ByteBuf;
use serde_json::Value;
use tracing::debug;

use crate::message::{
    domain::{
        AttachmentParts, Blob, BlobParts, BodyPart, DataBody, Disposition, HTML_MIME_TYPE, Header,
        HtmlBody, Message, MessageAttachment, SizeTable, TEXT_MIME_TYPE, TextBody, TextualBody,
        TextualParts, TransformPayload, Transforms,
    },
    error::{SerializationError, ValidationError},
};

use super::{decode_blobs, expect_attachment_disposition, expect_type};

/// Entities with a compact serialized form.
pub trait Compact: Sized {
    /// The positional representation.
    type Form: Serialize + DeserializeOwned;

    /// Builds the positional representation.
    fn to_compact_form(&self) -> Self::Form;

    /// Rebuilds the entity, running its structural validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn from_compact_form(form: Self::Form) -> Result<Self, ValidationError>;

    /// Encodes as MessagePack.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CompactEncode`] if encoding fails.
    fn to_compact(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(rmp_serde::to_vec(&self.to_compact_form())?)
    }

    /// Decodes MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CompactDecode`] for malformed bytes and
    /// [`SerializationError::Invalid`] for an entity that fails validation.
    fn from_compact(bytes: &[u8]) -> Result<Self, SerializationError> {
        let form = rmp_serde::from_slice(bytes)?;
        Ok(Self::from_compact_form(form)?)
    }
}

type CompactDigests = BTreeMap<i64, BTreeMap<i64, ByteBuf>>;

/// Compact form of a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompactBlob {
    /// Inline bytes.
    Inline(ByteBuf),
    /// Referenced blob without transforms.
    Referenced(String, SizeTable, CompactDigests),
    /// Referenced blob with transforms.
    Transformed(
        String,
        SizeTable,
        CompactDigests,
        BTreeMap<i64, TransformPayload>,
    ),
}

impl Compact for Blob {
    type Form = CompactBlob;

    fn to_compact_form(&self) -> CompactBlob {
        if let Some(data) = self.data() {
            return CompactBlob::Inline(ByteBuf::from(data.to_vec()));
        }

        let digests = self
            .digests()
            .iter()
            .map(|(compression, by_algorithm)| {
                let inner = by_algorithm
                    .iter()
                    .map(|(algorithm, digest)| (*algorithm, ByteBuf::from(digest.clone())))
                    .collect();
                (*compression, inner)
            })
            .collect();

        if self.transforms().is_empty() {
            CompactBlob::Referenced(self.id().to_owned(), self.sizes().clone(), digests)
        } else {
            CompactBlob::Transformed(
                self.id().to_owned(),
                self.sizes().clone(),
                digests,
                self.transforms().to_raw(),
            )
        }
    }

    fn from_compact_form(form: CompactBlob) -> Result<Self, ValidationError> {
        let (id, sizes, digests, raw_transforms) = match form {
            CompactBlob::Inline(bytes) => return Self::inline(bytes.into_vec()),
            CompactBlob::Referenced(id, sizes, digests) => (id, sizes, digests, BTreeMap::new()),
            CompactBlob::Transformed(id, sizes, digests, transforms) => {
                (id, sizes, digests, transforms)
            }
        };

        Self::from_parts(BlobParts {
            id,
            sizes,
            digests: digests
                .into_iter()
                .map(|(compression, by_algorithm)| {
                    let inner = by_algorithm
                        .into_iter()
                        .map(|(algorithm, digest)| (algorithm, digest.into_vec()))
                        .collect();
                    (compression, inner)
                })
                .collect(),
            data: None,
            transforms: Transforms::from_raw(raw_transforms)?,
        })
    }
}

/// Compact form of a text or HTML body:
/// `[content, contentId, type, disposition, charset, blobs, language]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactTextualBody {
    content: Option<ByteBuf>,
    content_id: String,
    mime_type: String,
    disposition: Disposition,
    charset: Option<String>,
    blobs: Vec<CompactBlob>,
    language: Option<String>,
}

fn textual_form(body: &TextualBody, part: &dyn BodyPart) -> CompactTextualBody {
    CompactTextualBody {
        content: body.content().map(|bytes| ByteBuf::from(bytes.to_vec())),
        content_id: part.content_id().to_owned(),
        mime_type: part.mime_type().to_owned(),
        disposition: part.disposition(),
        charset: body.charset().map(str::to_owned),
        blobs: body.blobs().iter().map(Blob::to_compact_form).collect(),
        language: body.language().map(str::to_owned),
    }
}

fn textual_parts(
    form: CompactTextualBody,
    expected_type: &str,
) -> Result<TextualParts, ValidationError> {
    expect_type(&form.mime_type, expected_type)?;
    Ok(TextualParts {
        content: form.content.map(ByteBuf::into_vec),
        content_id: form.content_id,
        disposition: form.disposition,
        blobs: decode_blobs(form.blobs, Blob::from_compact_form)?,
        charset: form.charset,
        language: form.language,
    })
}

impl Compact for TextBody {
    type Form = CompactTextualBody;

    fn to_compact_form(&self) -> CompactTextualBody {
        textual_form(self, self)
    }

    fn from_compact_form(form: CompactTextualBody) -> Result<Self, ValidationError> {
        Self::from_parts(textual_parts(form, TEXT_MIME_TYPE)?)
    }
}

impl Compact for HtmlBody {
    type Form = CompactTextualBody;

    fn to_compact_form(&self) -> CompactTextualBody {
        textual_form(self, self)
    }

    fn from_compact_form(form: CompactTextualBody) -> Result<Self, ValidationError> {
        Self::from_parts(textual_parts(form, HTML_MIME_TYPE)?)
    }
}

/// Compact form of a data body: `[content, contentId, type, disposition]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactDataBody {
    content: Value,
    content_id: String,
    mime_type: String,
    disposition: Disposition,
}

impl Compact for DataBody {
    type Form = CompactDataBody;

    fn to_compact_form(&self) -> CompactDataBody {
        CompactDataBody {
            content: self.content().clone(),
            content_id: self.content_id().to_owned(),
            mime_type: self.mime_type().to_owned(),
            disposition: self.disposition(),
        }
    }

    fn from_compact_form(form: CompactDataBody) -> Result<Self, ValidationError> {
        expect_attachment_disposition(form.disposition)?;
        let body = Self::new(form.content, form.mime_type)?;
        if form.content_id.is_empty() {
            return Ok(body);
        }
        body.with_content_id(form.content_id)
    }
}

/// Compact form of an attachment: `[name, type, contentId, blobs, origType]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactAttachment {
    name: String,
    mime_type: String,
    content_id: Option<String>,
    blobs: Vec<CompactBlob>,
    orig_type: Option<String>,
}

impl Compact for MessageAttachment {
    type Form = CompactAttachment;

    fn to_compact_form(&self) -> CompactAttachment {
        CompactAttachment {
            name: self.name().to_owned(),
            mime_type: self.mime_type().to_owned(),
            content_id: self.content_id().map(str::to_owned),
            blobs: self.blobs().iter().map(Blob::to_compact_form).collect(),
            orig_type: self.original_type().map(str::to_owned),
        }
    }

    fn from_compact_form(form: CompactAttachment) -> Result<Self, ValidationError> {
        Self::from_parts(AttachmentParts {
            name: form.name,
            mime_type: form.mime_type,
            blobs: decode_blobs(form.blobs, Blob::from_compact_form)?,
            content_id: form.content_id,
            original_type: form.orig_type,
        })
    }
}

/// Compact form of a message:
/// `[headers, bodyText, bodyHtml, bodyData, attachments]`.
///
/// Carries neither uuid nor folder state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactMessage {
    headers: Vec<Header>,
    body_text: Option<CompactTextualBody>,
    body_html: Option<CompactTextualBody>,
    body_data: Option<CompactDataBody>,
    attachments: Vec<CompactAttachment>,
}

impl Compact for Message {
    type Form = CompactMessage;

    fn to_compact_form(&self) -> CompactMessage {
        CompactMessage {
            headers: self.headers().to_vec(),
            body_text: self.body_text().map(TextBody::to_compact_form),
            body_html: self.body_html().map(HtmlBody::to_compact_form),
            body_data: self.body_data().map(DataBody::to_compact_form),
            attachments: self
                .attachments()
                .iter()
                .map(MessageAttachment::to_compact_form)
                .collect(),
        }
    }

    fn from_compact_form(form: CompactMessage) -> Result<Self, ValidationError> {
        let header_count = form.headers.len();
        let mut builder = Self::builder().with_headers(form.headers);
        if let Some(body) = form.body_text {
            builder = builder.with_body_text(TextBody::from_compact_form(body)?);
        }
        if let Some(body) = form.body_html {
            builder = builder.with_body_html(HtmlBody::from_compact_form(body)?);
        }
        if let Some(body) = form.body_data {
            builder = builder.with_body_data(DataBody::from_compact_form(body)?);
        }
        for attachment in form.attachments {
            builder = builder.with_attachment(MessageAttachment::from_compact_form(attachment)?);
        }

        let mut message = builder.build()?;
        message.skip_registered_content_ids();
        debug!(
            headers = header_count,
            attachments = message.attachments().len(),
            "decoded message from compact form"
        );
        Ok(message)
    }
}
