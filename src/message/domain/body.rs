//! Message body variants.
//!
//! A message has up to three body slots: plain text, HTML and structured
//! data. Text and HTML share [`TextualBody`], which holds exactly one of
//! inline content or a blob list. Structured data bodies always carry an
//! object or array value and are always attachments.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

use crate::message::{
    error::{UnimplementedError, ValidationError},
    ports::patterns::IdentifierPatterns,
};

use super::blob::{Blob, BlobInput, adapt_blobs, validate_blobs};

/// MIME type of plain text bodies.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// MIME type of HTML bodies.
pub const HTML_MIME_TYPE: &str = "text/html";

/// MIME types accepted for structured data bodies.
pub const DATA_MIME_TYPES: [&str; 3] = ["application/xml", "application/json", "application/msgpack"];

/// Charset pinned on bodies built from Rust strings.
pub const UTF8_CHARSET: &str = "UTF-8";

/// Content disposition of a body part.
///
/// Serialized as its integer code; legacy `"inline"` and `"attachment"`
/// labels are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Rendered as part of the message.
    #[default]
    Inline,
    /// Offered as a separate download.
    Attachment,
}

impl Disposition {
    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Inline => 1,
            Self::Attachment => 2,
        }
    }

    /// Resolves a wire code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for codes other than 1 and 2.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Self::Inline),
            2 => Ok(Self::Attachment),
            other => Err(invalid_disposition(other)),
        }
    }
}

fn invalid_disposition(value: impl fmt::Display) -> ValidationError {
    ValidationError::invalid_field(
        "disposition",
        value,
        "one of [1 (inline), 2 (attachment), \"inline\", \"attachment\"]",
    )
}

impl FromStr for Disposition {
    type Err = ValidationError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "inline" => Ok(Self::Inline),
            "attachment" => Ok(Self::Attachment),
            other => Err(invalid_disposition(other)),
        }
    }
}

impl Serialize for Disposition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DispositionRepr {
    Code(i64),
    Label(String),
}

impl<'de> Deserialize<'de> for Disposition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match DispositionRepr::deserialize(deserializer)? {
            DispositionRepr::Code(code) => Self::from_code(code),
            DispositionRepr::Label(label) => label.parse(),
        };
        parsed.map_err(de::Error::custom)
    }
}

/// Behaviour shared by every body variant.
pub trait BodyPart {
    /// Returns the MIME type.
    fn mime_type(&self) -> &str;

    /// Returns the content-id; empty until one is assigned.
    fn content_id(&self) -> &str;

    /// Returns the disposition.
    fn disposition(&self) -> Disposition;

    /// Checks every invariant that does not need an external pattern.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate_structure(&self) -> Result<(), ValidationError>;

    /// Checks every invariant, including blob-id patterns.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate(&self, _patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.validate_structure()
    }

    /// Converts inline content into a referenced blob.
    ///
    /// # Errors
    ///
    /// No variant supports this yet; every call returns
    /// [`UnimplementedError`].
    fn blobify(&self) -> Result<Blob, UnimplementedError> {
        Err(UnimplementedError::new("blobify"))
    }
}

/// Raw fields for a text or HTML body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextualParts {
    /// Inline encoded content.
    pub content: Option<Vec<u8>>,
    /// Content-id; empty to have one assigned by the message.
    pub content_id: String,
    /// Disposition.
    pub disposition: Disposition,
    /// Blob list entries.
    pub blobs: Vec<BlobInput>,
    /// Charset of the inline content.
    pub charset: Option<String>,
    /// Language tag.
    pub language: Option<String>,
}

/// Fields shared by text and HTML bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualBody {
    content: Option<Vec<u8>>,
    content_id: String,
    disposition: Disposition,
    blobs: Vec<Blob>,
    charset: Option<String>,
    language: Option<String>,
}

impl TextualBody {
    fn from_parts(parts: TextualParts) -> Result<Self, ValidationError> {
        Ok(Self {
            content: parts.content,
            content_id: parts.content_id,
            disposition: parts.disposition,
            blobs: adapt_blobs(parts.blobs)?,
            charset: parts.charset,
            language: parts.language,
        })
    }

    fn from_text(text: &str) -> Self {
        Self {
            content: Some(text.as_bytes().to_vec()),
            content_id: String::new(),
            disposition: Disposition::Inline,
            blobs: Vec::new(),
            charset: Some(UTF8_CHARSET.to_owned()),
            language: None,
        }
    }

    /// Returns the inline content bytes.
    #[must_use]
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Returns the blob list.
    #[must_use]
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Returns the charset of the inline content.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Returns the language tag.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn validate_shared(&self) -> Result<(), ValidationError> {
        let has_content = self.content.is_some();
        let has_blobs = !self.blobs.is_empty();
        if has_content == has_blobs {
            return Err(ValidationError::ContentExclusivity);
        }

        self.blobs.iter().enumerate().try_for_each(|(index, blob)| {
            blob.validate_structure()
                .map_err(|source| ValidationError::at_blob(index, source))
        })
    }
}

fn require_content_id(content_id: String) -> Result<String, ValidationError> {
    if content_id.is_empty() {
        return Err(ValidationError::invalid_field(
            "contentId",
            "<empty>",
            "a non-empty string",
        ));
    }
    Ok(content_id)
}

macro_rules! textual_body {
    ($(#[$meta:meta])* $name:ident, $mime:expr, checks_language: $checks_language:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(TextualBody);

        impl $name {
            /// Creates a body from a string, pinning the charset to UTF-8.
            #[must_use]
            pub fn from_text(text: &str) -> Self {
                Self(TextualBody::from_text(text))
            }

            /// Creates a body from pre-encoded bytes.
            #[must_use]
            pub fn from_bytes(content: Vec<u8>, charset: Option<String>) -> Self {
                Self(TextualBody {
                    content: Some(content),
                    content_id: String::new(),
                    disposition: Disposition::Inline,
                    blobs: Vec::new(),
                    charset,
                    language: None,
                })
            }

            /// Creates a body whose content lives in blobs.
            ///
            /// # Errors
            ///
            /// Returns an error if the list is empty or an entry is invalid.
            pub fn from_blobs(
                blobs: impl IntoIterator<Item = BlobInput>,
            ) -> Result<Self, ValidationError> {
                Self::from_parts(TextualParts {
                    blobs: blobs.into_iter().collect(),
                    ..TextualParts::default()
                })
            }

            /// Creates a body from raw parts, running structural validation.
            ///
            /// # Errors
            ///
            /// Returns the first violated invariant.
            pub fn from_parts(parts: TextualParts) -> Result<Self, ValidationError> {
                let body = Self(TextualBody::from_parts(parts)?);
                body.validate_structure()?;
                Ok(body)
            }

            /// Returns a copy with the content-id replaced.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidField`] for an empty id.
            pub fn with_content_id(
                mut self,
                content_id: impl Into<String>,
            ) -> Result<Self, ValidationError> {
                self.0.content_id = require_content_id(content_id.into())?;
                Ok(self)
            }

            /// Returns a copy with the disposition replaced.
            #[must_use]
            pub const fn with_disposition(mut self, disposition: Disposition) -> Self {
                self.0.disposition = disposition;
                self
            }

            /// Returns a copy with the language tag replaced.
            ///
            /// # Errors
            ///
            /// Returns the validation error of the resulting body.
            pub fn with_language(
                mut self,
                language: Option<String>,
            ) -> Result<Self, ValidationError> {
                self.0.language = language;
                self.validate_structure()?;
                Ok(self)
            }

            pub(crate) fn assign_content_id(&mut self, content_id: String) {
                self.0.content_id = content_id;
            }
        }

        impl Deref for $name {
            type Target = TextualBody;

            fn deref(&self) -> &TextualBody {
                &self.0
            }
        }

        impl BodyPart for $name {
            fn mime_type(&self) -> &str {
                $mime
            }

            fn content_id(&self) -> &str {
                &self.0.content_id
            }

            fn disposition(&self) -> Disposition {
                self.0.disposition
            }

            fn validate_structure(&self) -> Result<(), ValidationError> {
                self.0.validate_shared()?;
                if $checks_language {
                    validate_language(self.0.language.as_deref())?;
                }
                Ok(())
            }

            fn validate(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
                self.validate_structure()?;
                validate_blobs(&self.0.blobs, patterns)
            }
        }
    };
}

textual_body!(
    /// A `text/plain` body.
    ///
    /// # Examples
    ///
    /// ```
    /// use missive::message::domain::{BodyPart, TextBody};
    ///
    /// let body = TextBody::from_text("Hello");
    /// assert_eq!(body.mime_type(), "text/plain");
    /// assert_eq!(body.charset(), Some("UTF-8"));
    /// assert!(body.blobify().is_err());
    /// ```
    TextBody,
    TEXT_MIME_TYPE,
    checks_language: false
);

textual_body!(
    /// A `text/html` body.
    HtmlBody,
    HTML_MIME_TYPE,
    checks_language: true
);

fn validate_language(language: Option<&str>) -> Result<(), ValidationError> {
    match language {
        Some("") => Err(ValidationError::invalid_field(
            "language",
            "<empty>",
            "null or a non-empty string",
        )),
        _ => Ok(()),
    }
}

/// A structured data body.
///
/// Content is an object or array value; the disposition is always
/// [`Disposition::Attachment`].
///
/// # Examples
///
/// ```
/// use missive::message::domain::{BodyPart, DataBody, Disposition};
/// use serde_json::json;
///
/// let body = DataBody::new(json!({"event": "invite"}), "application/json")
///     .expect("valid data body");
/// assert_eq!(body.disposition(), Disposition::Attachment);
///
/// assert!(DataBody::new(json!("scalar"), "application/json").is_err());
/// assert!(DataBody::new(json!([]), "text/csv").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBody {
    content: Value,
    content_id: String,
    mime_type: String,
}

impl DataBody {
    /// Creates a validated data body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if the content is not an
    /// object or array, or the MIME type is not accepted.
    pub fn new(content: Value, mime_type: impl Into<String>) -> Result<Self, ValidationError> {
        let body = Self {
            content,
            content_id: String::new(),
            mime_type: mime_type.into(),
        };
        body.validate_structure()?;
        Ok(body)
    }

    /// Returns a copy with the content-id replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for an empty id.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Result<Self, ValidationError> {
        self.content_id = require_content_id(content_id.into())?;
        Ok(self)
    }

    /// Returns the structured content.
    #[must_use]
    pub const fn content(&self) -> &Value {
        &self.content
    }

    pub(crate) fn assign_content_id(&mut self, content_id: String) {
        self.content_id = content_id;
    }
}

impl BodyPart for DataBody {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn content_id(&self) -> &str {
        &self.content_id
    }

    fn disposition(&self) -> Disposition {
        Disposition::Attachment
    }

    fn validate_structure(&self) -> Result<(), ValidationError> {
        if !(self.content.is_object() || self.content.is_array()) {
            return Err(ValidationError::invalid_field(
                "data content",
                &self.content,
                "an object or array",
            ));
        }
        if !DATA_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(ValidationError::invalid_field(
                "data type",
                &self.mime_type,
                format!("one of {DATA_MIME_TYPES:?}"),
            ));
        }
        Ok(())
    }
}

/// Any body variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Plain text.
    Text(TextBody),
    /// HTML.
    Html(HtmlBody),
    /// Structured data.
    Data(DataBody),
}

impl MessageBody {
    fn part(&self) -> &dyn BodyPart {
        match self {
            Self::Text(body) => body,
            Self::Html(body) => body,
            Self::Data(body) => body,
        }
    }
}

impl BodyPart for MessageBody {
    fn mime_type(&self) -> &str {
        self.part().mime_type()
    }

    fn content_id(&self) -> &str {
        self.part().content_id()
    }

    fn disposition(&self) -> Disposition {
        self.part().disposition()
    }

    fn validate_structure(&self) -> Result<(), ValidationError> {
        self.part().validate_structure()
    }

    fn validate(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.part().validate(patterns)
    }

    fn blobify(&self) -> Result<Blob, UnimplementedError> {
        self.part().blobify()
    }
}

impl From<TextBody> for MessageBody {
    fn from(body: TextBody) -> Self {
        Self::Text(body)
    }
}

impl From<HtmlBody> for MessageBody {
    fn from(body: HtmlBody) -> Self {
        Self::Html(body)
    }
}

impl From<DataBody> for MessageBody {
    fn from(body: DataBody) -> Self {
        Self::Data(body)
    }
}
