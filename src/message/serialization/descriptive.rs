//! Descriptive form: keyed maps mirroring the entity fields.
//!
//! Numeric table keys become strings so the tree stays valid JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_bytes::ByteBuf;
use serde_json::Value;
use tracing::debug;

use crate::message::{
    domain::{
        AttachmentParts, Blob, BlobParts, BodyPart, DataBody, DigestTable, Disposition,
        HTML_MIME_TYPE, Header, HtmlBody, Message, MessageAttachment, SizeTable, TEXT_MIME_TYPE,
        TextBody, TextualBody, TextualParts, TransformPayload, Transforms,
    },
    error::{SerializationError, ValidationError},
};

use super::{decode_blobs, expect_attachment_disposition, expect_type};

/// Entities with a descriptive serialized form.
pub trait Descriptive: Sized {
    /// The keyed representation.
    type Form: Serialize + DeserializeOwned;

    /// Builds the keyed representation.
    fn to_descriptive_form(&self) -> Self::Form;

    /// Rebuilds the entity, running its structural validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn from_descriptive_form(form: Self::Form) -> Result<Self, ValidationError>;

    /// Serializes into a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::Descriptive`] if the tree cannot be built.
    fn to_descriptive(&self) -> Result<Value, SerializationError> {
        Ok(serde_json::to_value(self.to_descriptive_form())?)
    }

    /// Decodes a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::Descriptive`] for a malformed tree and
    /// [`SerializationError::Invalid`] for an entity that fails validation.
    fn from_descriptive(value: Value) -> Result<Self, SerializationError> {
        let form = serde_json::from_value(value)?;
        Ok(Self::from_descriptive_form(form)?)
    }
}

/// Descriptive form of a blob: raw bytes when inline, else a keyed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptiveBlob {
    /// Inline bytes.
    Inline(ByteBuf),
    /// Referenced blob.
    Referenced(DescriptiveReference),
}

/// Descriptive form of a referenced blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveReference {
    id: String,
    sizes: BTreeMap<String, i64>,
    digests: BTreeMap<String, BTreeMap<String, ByteBuf>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    transforms: BTreeMap<String, TransformPayload>,
}

fn parse_key(field: &str, key: &str) -> Result<i64, ValidationError> {
    key.parse()
        .map_err(|_| ValidationError::invalid_field(field, key, "an integer key"))
}

impl Descriptive for Blob {
    type Form = DescriptiveBlob;

    fn to_descriptive_form(&self) -> DescriptiveBlob {
        if let Some(data) = self.data() {
            return DescriptiveBlob::Inline(ByteBuf::from(data.to_vec()));
        }

        DescriptiveBlob::Referenced(DescriptiveReference {
            id: self.id().to_owned(),
            sizes: self
                .sizes()
                .iter()
                .map(|(compression, size)| (compression.to_string(), *size))
                .collect(),
            digests: self
                .digests()
                .iter()
                .map(|(compression, by_algorithm)| {
                    let digests = by_algorithm
                        .iter()
                        .map(|(algorithm, digest)| {
                            (algorithm.to_string(), ByteBuf::from(digest.clone()))
                        })
                        .collect();
                    (compression.to_string(), digests)
                })
                .collect(),
            transforms: self
                .transforms()
                .to_raw()
                .into_iter()
                .map(|(key, payload)| (key.to_string(), payload))
                .collect(),
        })
    }

    fn from_descriptive_form(form: DescriptiveBlob) -> Result<Self, ValidationError> {
        let reference = match form {
            DescriptiveBlob::Inline(bytes) => return Self::inline(bytes.into_vec()),
            DescriptiveBlob::Referenced(reference) => reference,
        };

        let sizes = reference
            .sizes
            .into_iter()
            .map(|(key, size)| Ok((parse_key("size key", &key)?, size)))
            .collect::<Result<SizeTable, ValidationError>>()?;
        let digests = reference
            .digests
            .into_iter()
            .map(|(key, by_algorithm)| {
                let compression = parse_key("digest compression key", &key)?;
                let inner = by_algorithm
                    .into_iter()
                    .map(|(code, digest)| {
                        Ok((parse_key("digest algorithm key", &code)?, digest.into_vec()))
                    })
                    .collect::<Result<BTreeMap<_, _>, ValidationError>>()?;
                Ok((compression, inner))
            })
            .collect::<Result<DigestTable, ValidationError>>()?;
        let raw_transforms = reference
            .transforms
            .into_iter()
            .map(|(key, payload)| Ok((parse_key("transform key", &key)?, payload)))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Self::from_parts(BlobParts {
            id: reference.id,
            sizes,
            digests,
            data: None,
            transforms: Transforms::from_raw(raw_transforms)?,
        })
    }
}

/// Descriptive form of a text or HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveTextualBody {
    content: Option<ByteBuf>,
    #[serde(default)]
    content_id: String,
    #[serde(rename = "type")]
    mime_type: String,
    #[serde(default)]
    disposition: Disposition,
    charset: Option<String>,
    #[serde(default)]
    blobs: Vec<DescriptiveBlob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

fn textual_form(body: &TextualBody, part: &dyn BodyPart) -> DescriptiveTextualBody {
    DescriptiveTextualBody {
        content: body.content().map(|bytes| ByteBuf::from(bytes.to_vec())),
        content_id: part.content_id().to_owned(),
        mime_type: part.mime_type().to_owned(),
        disposition: part.disposition(),
        charset: body.charset().map(str::to_owned),
        blobs: body.blobs().iter().map(Blob::to_descriptive_form).collect(),
        language: body.language().map(str::to_owned),
    }
}

fn textual_parts(
    form: DescriptiveTextualBody,
    expected_type: &str,
) -> Result<TextualParts, ValidationError> {
    expect_type(&form.mime_type, expected_type)?;
    Ok(TextualParts {
        content: form.content.map(ByteBuf::into_vec),
        content_id: form.content_id,
        disposition: form.disposition,
        blobs: decode_blobs(form.blobs, Blob::from_descriptive_form)?,
        charset: form.charset,
        language: form.language,
    })
}

impl Descriptive for TextBody {
    type Form = DescriptiveTextualBody;

    fn to_descriptive_form(&self) -> DescriptiveTextualBody {
        textual_form(self, self)
    }

    fn from_descriptive_form(form: DescriptiveTextualBody) -> Result<Self, ValidationError> {
        Self::from_parts(textual_parts(form, TEXT_MIME_TYPE)?)
    }
}

impl Descriptive for HtmlBody {
    type Form = DescriptiveTextualBody;

    fn to_descriptive_form(&self) -> DescriptiveTextualBody {
        textual_form(self, self)
    }

    fn from_descriptive_form(form: DescriptiveTextualBody) -> Result<Self, ValidationError> {
        Self::from_parts(textual_parts(form, HTML_MIME_TYPE)?)
    }
}

/// Descriptive form of a structured data body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveDataBody {
    content: Value,
    #[serde(default)]
    content_id: String,
    #[serde(rename = "type")]
    mime_type: String,
    disposition: Disposition,
}

impl Descriptive for DataBody {
    type Form = DescriptiveDataBody;

    fn to_descriptive_form(&self) -> DescriptiveDataBody {
        DescriptiveDataBody {
            content: self.content().clone(),
            content_id: self.content_id().to_owned(),
            mime_type: self.mime_type().to_owned(),
            disposition: self.disposition(),
        }
    }

    fn from_descriptive_form(form: DescriptiveDataBody) -> Result<Self, ValidationError> {
        expect_attachment_disposition(form.disposition)?;
        let body = Self::new(form.content, form.mime_type)?;
        if form.content_id.is_empty() {
            return Ok(body);
        }
        body.with_content_id(form.content_id)
    }
}

/// Descriptive form of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveAttachment {
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
    content_id: Option<String>,
    blobs: Vec<DescriptiveBlob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    orig_type: Option<String>,
}

impl Descriptive for MessageAttachment {
    type Form = DescriptiveAttachment;

    fn to_descriptive_form(&self) -> DescriptiveAttachment {
        DescriptiveAttachment {
            name: self.name().to_owned(),
            mime_type: self.mime_type().to_owned(),
            content_id: self.content_id().map(str::to_owned),
            blobs: self.blobs().iter().map(Blob::to_descriptive_form).collect(),
            orig_type: self.original_type().map(str::to_owned),
        }
    }

    fn from_descriptive_form(form: DescriptiveAttachment) -> Result<Self, ValidationError> {
        Self::from_parts(AttachmentParts {
            name: form.name,
            mime_type: form.mime_type,
            blobs: decode_blobs(form.blobs, Blob::from_descriptive_form)?,
            content_id: form.content_id,
            original_type: form.orig_type,
        })
    }
}

/// Descriptive form of a message. Carries neither uuid nor folder state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveMessage {
    headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body_text: Option<DescriptiveTextualBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body_html: Option<DescriptiveTextualBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body_data: Option<DescriptiveDataBody>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<DescriptiveAttachment>,
}

impl Descriptive for Message {
    type Form = DescriptiveMessage;

    fn to_descriptive_form(&self) -> DescriptiveMessage {
        DescriptiveMessage {
            headers: self.headers().to_vec(),
            body_text: self.body_text().map(TextBody::to_descriptive_form),
            body_html: self.body_html().map(HtmlBody::to_descriptive_form),
            body_data: self.body_data().map(DataBody::to_descriptive_form),
            attachments: self
                .attachments()
                .iter()
                .map(MessageAttachment::to_descriptive_form)
                .collect(),
        }
    }

    fn from_descriptive_form(form: DescriptiveMessage) -> Result<Self, ValidationError> {
        let header_count = form.headers.len();
        let mut builder = Self::builder().with_headers(form.headers);
        if let Some(body) = form.body_text {
            builder = builder.with_body_text(TextBody::from_descriptive_form(body)?);
        }
        if let Some(body) = form.body_html {
            builder = builder.with_body_html(HtmlBody::from_descriptive_form(body)?);
        }
        if let Some(body) = form.body_data {
            builder = builder.with_body_data(DataBody::from_descriptive_form(body)?);
        }
        for attachment in form.attachments {
            builder = builder.with_attachment(MessageAttachment::from_descriptive_form(attachment)?);
        }

        let mut message = builder.build()?;
        message.skip_registered_content_ids();
        debug!(
            headers = header_count,
            attachments = message.attachments().len(),
            "decoded message from descriptive form"
        );
        Ok(message)
    }
}
