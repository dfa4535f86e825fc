//! Blob transform descriptors.
//!
//! A transform describes a manipulation an external reader applies to the
//! raw bytes of a blob (a byte window, a content encoding, newline run
//! restoration, a charset). Transforms are validated here but never
//! executed. A blob owns at most one transform per [`TransformKey`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::error::ValidationError;

/// Key identifying a transform variant inside a blob's transform mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformKey {
    /// Byte offset into the stored data.
    Offset,
    /// Number of bytes to read.
    Length,
    /// Content encoding of the stored data.
    Encoding,
    /// Newline run-length table for `\n` line endings.
    NewlineN,
    /// Newline run-length table for `\r\n` line endings.
    NewlineRn,
    /// Character set of the decoded text.
    Charset,
}

impl TransformKey {
    /// Every legal key in code order.
    pub const ALL: [Self; 6] = [
        Self::Offset,
        Self::Length,
        Self::Encoding,
        Self::NewlineN,
        Self::NewlineRn,
        Self::Charset,
    ];

    /// Returns the wire code of this key.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Offset => 0,
            Self::Length => 1,
            Self::Encoding => 2,
            Self::NewlineN => 3,
            Self::NewlineRn => 5,
            Self::Charset => 6,
        }
    }

    /// Resolves a wire code into a key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransformKey`] for codes outside
    /// `{0,1,2,3,5,6}`.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|key| key.code() == code)
            .ok_or(ValidationError::InvalidTransformKey(code))
    }
}

impl fmt::Display for TransformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Content encoding applied to stored blob bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformEncoding {
    /// Bytes are stored as-is.
    #[default]
    Identity,
    /// Bytes are stored base64-encoded.
    Base64,
}

impl TransformEncoding {
    /// Returns the wire code of this encoding.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Identity => 0,
            Self::Base64 => 1,
        }
    }

    /// Resolves a wire code into an encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for unknown codes.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::Identity),
            1 => Ok(Self::Base64),
            other => Err(ValidationError::invalid_field(
                "encoding",
                other,
                "one of [0 (identity), 1 (base64)]",
            )),
        }
    }
}

/// One entry of a newline run-length table.
///
/// Records that a newline occurs every `byte_count` bytes, `repeat_count`
/// times in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewlineRun {
    /// Distance in bytes between consecutive newlines.
    pub byte_count: i64,
    /// Number of consecutive repetitions.
    pub repeat_count: i64,
}

impl NewlineRun {
    /// Creates a run entry.
    #[must_use]
    pub const fn new(byte_count: i64, repeat_count: i64) -> Self {
        Self {
            byte_count,
            repeat_count,
        }
    }
}

/// Raw transform payload as it appears in serialized forms.
///
/// The variant key is carried by the position in the owning mapping, so
/// the payload only holds the scalar or array value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformPayload {
    /// Integer payload (offset, length, encoding code).
    Integer(i64),
    /// Array of integer pairs (newline run tables).
    Runs(Vec<Vec<i64>>),
    /// String payload (charset).
    Text(String),
}

impl fmt::Display for TransformPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Runs(runs) => write!(f, "{runs:?}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// A validated transform descriptor.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{BlobTransform, NewlineRun};
///
/// assert!(BlobTransform::NewlineN(vec![NewlineRun::new(2, 2)]).validate().is_ok());
/// assert!(BlobTransform::NewlineN(vec![NewlineRun::new(1, 2)]).validate().is_err());
/// assert!(BlobTransform::NewlineN(Vec::new()).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobTransform {
    /// Byte offset, must be non-negative.
    Offset(i64),
    /// Byte length, must be non-negative.
    Length(i64),
    /// Content encoding.
    Encoding(TransformEncoding),
    /// `\n` run-length table, non-empty with entries strictly above one.
    NewlineN(Vec<NewlineRun>),
    /// `\r\n` run-length table, non-empty with entries strictly above one.
    NewlineRn(Vec<NewlineRun>),
    /// Charset name, longer than one character.
    Charset(String),
}

impl BlobTransform {
    /// Returns the mapping key this transform is stored under.
    #[must_use]
    pub const fn key(&self) -> TransformKey {
        match self {
            Self::Offset(_) => TransformKey::Offset,
            Self::Length(_) => TransformKey::Length,
            Self::Encoding(_) => TransformKey::Encoding,
            Self::NewlineN(_) => TransformKey::NewlineN,
            Self::NewlineRn(_) => TransformKey::NewlineRn,
            Self::Charset(_) => TransformKey::Charset,
        }
    }

    /// Checks the variant's own payload rule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] naming the offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Offset(offset) => validate_non_negative("offset", *offset),
            Self::Length(length) => validate_non_negative("length", *length),
            Self::Encoding(_) => Ok(()),
            Self::NewlineN(runs) | Self::NewlineRn(runs) => validate_runs(runs),
            Self::Charset(charset) => {
                if charset.chars().count() > 1 {
                    Ok(())
                } else {
                    Err(ValidationError::invalid_field(
                        "charset",
                        charset,
                        "a string longer than one character",
                    ))
                }
            }
        }
    }

    /// Re-creates the concrete variant for `key` from a raw payload and
    /// validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if the payload has the
    /// wrong shape for the key or fails the variant's rule.
    pub fn from_payload(
        key: TransformKey,
        payload: &TransformPayload,
    ) -> Result<Self, ValidationError> {
        let transform = match (key, payload) {
            (TransformKey::Offset, TransformPayload::Integer(value)) => Self::Offset(*value),
            (TransformKey::Length, TransformPayload::Integer(value)) => Self::Length(*value),
            (TransformKey::Encoding, TransformPayload::Integer(code)) => {
                Self::Encoding(TransformEncoding::from_code(*code)?)
            }
            (TransformKey::NewlineN, TransformPayload::Runs(entries)) => {
                Self::NewlineN(runs_from_pairs(entries)?)
            }
            (TransformKey::NewlineRn, TransformPayload::Runs(entries)) => {
                Self::NewlineRn(runs_from_pairs(entries)?)
            }
            (TransformKey::Charset, TransformPayload::Text(charset)) => {
                Self::Charset(charset.clone())
            }
            (other, _) => {
                return Err(ValidationError::invalid_field(
                    format!("transform {other} payload"),
                    payload,
                    expected_payload(other),
                ));
            }
        };
        transform.validate()?;
        Ok(transform)
    }

    /// Returns the scalar or array payload of this transform.
    #[must_use]
    pub fn to_payload(&self) -> TransformPayload {
        match self {
            Self::Offset(value) | Self::Length(value) => TransformPayload::Integer(*value),
            Self::Encoding(encoding) => TransformPayload::Integer(encoding.code()),
            Self::NewlineN(runs) | Self::NewlineRn(runs) => TransformPayload::Runs(
                runs.iter()
                    .map(|run| vec![run.byte_count, run.repeat_count])
                    .collect(),
            ),
            Self::Charset(charset) => TransformPayload::Text(charset.clone()),
        }
    }
}

const fn expected_payload(key: TransformKey) -> &'static str {
    match key {
        TransformKey::Offset | TransformKey::Length => "a non-negative integer",
        TransformKey::Encoding => "an integer encoding code",
        TransformKey::NewlineN | TransformKey::NewlineRn => "a non-empty array of integer pairs",
        TransformKey::Charset => "a string longer than one character",
    }
}

fn validate_non_negative(field: &str, value: i64) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ValidationError::invalid_field(
            field,
            value,
            "a non-negative integer",
        ))
    }
}

fn validate_runs(runs: &[NewlineRun]) -> Result<(), ValidationError> {
    if runs.is_empty() {
        return Err(ValidationError::invalid_field(
            "newline runs",
            "[]",
            "a non-empty array of integer pairs",
        ));
    }

    for (index, run) in runs.iter().enumerate() {
        if run.byte_count <= 1 {
            return Err(ValidationError::invalid_field(
                format!("newline runs[{index}] byte count"),
                run.byte_count,
                "an integer greater than 1",
            ));
        }
        if run.repeat_count <= 1 {
            return Err(ValidationError::invalid_field(
                format!("newline runs[{index}] repeat count"),
                run.repeat_count,
                "an integer greater than 1",
            ));
        }
    }

    Ok(())
}

fn runs_from_pairs(entries: &[Vec<i64>]) -> Result<Vec<NewlineRun>, ValidationError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.as_slice() {
            [byte_count, repeat_count] => Ok(NewlineRun::new(*byte_count, *repeat_count)),
            _ => Err(ValidationError::invalid_field(
                format!("newline runs[{index}]"),
                format!("{entry:?}"),
                "a pair of integers",
            )),
        })
        .collect()
}

/// The validated transform pipeline of a blob, keyed by [`TransformKey`].
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use missive::message::domain::{TransformPayload, Transforms};
///
/// let raw = BTreeMap::from([
///     (0, TransformPayload::Integer(16)),
///     (6, TransformPayload::Text("UTF-8".to_owned())),
/// ]);
/// let transforms = Transforms::from_raw(raw).expect("valid transforms");
/// assert_eq!(transforms.len(), 2);
///
/// let bad = BTreeMap::from([(4, TransformPayload::Integer(1))]);
/// assert!(Transforms::from_raw(bad).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transforms(BTreeMap<TransformKey, BlobTransform>);

impl Transforms {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline from raw `(key code, payload)` entries.
    ///
    /// Every payload is coerced into its concrete variant and validated
    /// before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransformKey`] for an unknown key,
    /// or the variant's validation error for a bad payload.
    pub fn from_raw(
        raw: impl IntoIterator<Item = (i64, TransformPayload)>,
    ) -> Result<Self, ValidationError> {
        let mut transforms = Self::new();
        for (code, payload) in raw {
            let key = TransformKey::from_code(code)?;
            let transform = BlobTransform::from_payload(key, &payload)?;
            transforms.0.insert(key, transform);
        }
        Ok(transforms)
    }

    /// Adds a transform, replacing any existing transform with the same key.
    ///
    /// # Errors
    ///
    /// Returns the transform's validation error; the pipeline is unchanged.
    pub fn with(mut self, transform: BlobTransform) -> Result<Self, ValidationError> {
        transform.validate()?;
        self.0.insert(transform.key(), transform);
        Ok(self)
    }

    /// Returns the transform stored under `key`.
    #[must_use]
    pub fn get(&self, key: TransformKey) -> Option<&BlobTransform> {
        self.0.get(&key)
    }

    /// Iterates transforms in key order.
    pub fn iter(&self) -> impl Iterator<Item = &BlobTransform> {
        self.0.values()
    }

    /// Returns the number of transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no transforms are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-validates every transform.
    ///
    /// # Errors
    ///
    /// Returns the first transform validation error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.0.values().try_for_each(BlobTransform::validate)
    }

    /// Returns the raw `(key code, payload)` mapping.
    #[must_use]
    pub fn to_raw(&self) -> BTreeMap<i64, TransformPayload> {
        self.0
            .iter()
            .map(|(key, transform)| (key.code(), transform.to_payload()))
            .collect()
    }
}
