//! Named attachments made of blobs.

use crate::message::{error::ValidationError, ports::patterns::IdentifierPatterns};

use super::blob::{Blob, BlobInput, adapt_blobs, validate_blobs};

/// MIME type assumed when an attachment does not state one.
pub const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

/// Raw attachment fields, validated by [`MessageAttachment::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentParts {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Blob list entries.
    pub blobs: Vec<BlobInput>,
    /// Content-id referenced from markup.
    pub content_id: Option<String>,
    /// MIME type the attachment had before any conversion.
    pub original_type: Option<String>,
}

impl Default for AttachmentParts {
    fn default() -> Self {
        Self {
            name: String::new(),
            mime_type: DEFAULT_ATTACHMENT_TYPE.to_owned(),
            blobs: Vec::new(),
            content_id: None,
            original_type: None,
        }
    }
}

/// A named, typed collection of blobs attached to a message.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{BlobInput, MessageAttachment};
///
/// let attachment = MessageAttachment::new("notes.txt", "text/plain")
///     .with_blob(BlobInput::Bytes(b"remember".to_vec()))
///     .expect("valid blob");
/// assert_eq!(attachment.blobs().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttachment {
    name: String,
    mime_type: String,
    blobs: Vec<Blob>,
    content_id: Option<String>,
    original_type: Option<String>,
}

impl MessageAttachment {
    /// Creates an attachment without blobs.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            blobs: Vec::new(),
            content_id: None,
            original_type: None,
        }
    }

    /// Creates an attachment from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBlob`] citing the offending index.
    pub fn from_parts(parts: AttachmentParts) -> Result<Self, ValidationError> {
        Ok(Self {
            name: parts.name,
            mime_type: parts.mime_type,
            blobs: adapt_blobs(parts.blobs)?,
            content_id: parts.content_id,
            original_type: parts.original_type,
        })
    }

    /// Returns a copy with a blob appended.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBlob`] if the entry is invalid.
    pub fn with_blob(mut self, blob: BlobInput) -> Result<Self, ValidationError> {
        let index = self.blobs.len();
        let mut adapted = adapt_blobs([blob]).map_err(|err| match err {
            ValidationError::InvalidBlob { source, .. } => ValidationError::at_blob(index, *source),
            other => other,
        })?;
        self.blobs.append(&mut adapted);
        Ok(self)
    }

    /// Returns a copy with the content-id replaced.
    #[must_use]
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Returns a copy with the original type recorded.
    #[must_use]
    pub fn with_original_type(mut self, original_type: impl Into<String>) -> Self {
        self.original_type = Some(original_type.into());
        self
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the blob list.
    #[must_use]
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Returns the content-id.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// Returns the original MIME type.
    #[must_use]
    pub fn original_type(&self) -> Option<&str> {
        self.original_type.as_deref()
    }

    /// Validates an inbound attachment: every blob must be valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBlob`] citing the offending index.
    pub fn validate(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        validate_blobs(&self.blobs, patterns)
    }

    /// Validates an outbound attachment: name and type must also be set.
    ///
    /// # Errors
    ///
    /// Returns the first violation.
    pub fn validate_strict(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.validate(patterns)?;
        if self.name.is_empty() {
            return Err(ValidationError::invalid_field(
                "attachment name",
                "<empty>",
                "a non-empty string",
            ));
        }
        if self.mime_type.is_empty() {
            return Err(ValidationError::invalid_field(
                "attachment type",
                "<empty>",
                "a non-empty string",
            ));
        }
        Ok(())
    }
}
