//! Inline or content-addressed binary payloads.
//!
//! A [`Blob`] either carries its bytes inline, or references stored content
//! by id together with a size table (per compression method) and a digest
//! table (per compression method, per digest algorithm).

use std::collections::BTreeMap;

use crate::message::{
    error::ValidationError,
    ports::patterns::{IdentifierPatterns, PatternKind},
};

use super::transform::{TransformPayload, Transforms};

/// Largest size a blob may declare, in bytes.
pub const MAX_BLOB_SIZE: i64 = 1 << 30;

/// Size table: compression method code to byte count.
pub type SizeTable = BTreeMap<i64, i64>;

/// Digest table: compression method code to digest algorithm code to digest bytes.
pub type DigestTable = BTreeMap<i64, BTreeMap<i64, Vec<u8>>>;

/// Compression methods a stored blob may be kept under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Compression is not known.
    Unknown,
    /// Uncompressed.
    Null,
    /// zlib.
    Zlib,
    /// xz.
    Xz,
    /// zstd.
    Zstd,
}

impl Compression {
    /// Returns the wire code of this method.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Unknown => -1,
            Self::Null => 0,
            Self::Zlib => 1,
            Self::Xz => 2,
            Self::Zstd => 5,
        }
    }

    /// Resolves a wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Unknown),
            0 => Some(Self::Null),
            1 => Some(Self::Zlib),
            2 => Some(Self::Xz),
            5 => Some(Self::Zstd),
            _ => None,
        }
    }
}

/// Digest algorithms recognised in a digest table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-1, 20 bytes.
    Sha1,
    /// SHA-224, 28 bytes.
    Sha224,
    /// SHA-256, 32 bytes.
    Sha256,
    /// SHA-512, 64 bytes.
    Sha512,
    /// SHA-384, 48 bytes.
    Sha384,
}

impl DigestAlgorithm {
    /// Every recognised algorithm in code order.
    pub const ALL: [Self; 5] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha512,
        Self::Sha384,
    ];

    /// Returns the wire code of this algorithm.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Sha1 => 1,
            Self::Sha224 => 2,
            Self::Sha256 => 3,
            Self::Sha512 => 4,
            Self::Sha384 => 5,
        }
    }

    /// Resolves a wire code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.code() == code)
    }

    /// Returns the fixed digest length in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Raw blob fields, validated by [`Blob::from_parts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobParts {
    /// External blob id; empty for inline blobs.
    pub id: String,
    /// Size table.
    pub sizes: SizeTable,
    /// Digest table.
    pub digests: DigestTable,
    /// Inline bytes.
    pub data: Option<Vec<u8>>,
    /// Transform pipeline.
    pub transforms: Transforms,
}

/// A binary payload, either inline or referenced by id.
///
/// # Invariants
///
/// - Inline: `data` is non-empty and id, sizes and digests are all empty
/// - Referenced: every size is in `1..=MAX_BLOB_SIZE` under a non-negative
///   key, and every digest has its algorithm's fixed length
///
/// The id is checked against the external blob-id pattern by
/// [`Blob::validate`], which needs the pattern collaborator.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{Blob, Compression, DigestAlgorithm};
///
/// let inline = Blob::inline(b"hello".to_vec()).expect("inline blob");
/// assert!(inline.is_inline());
///
/// let referenced = Blob::referenced("Qm9keVN0b3JhZ2VCbG9iMDE")
///     .with_size(Compression::Null.code(), 5)
///     .and_then(|blob| blob.with_digest(Compression::Null.code(), DigestAlgorithm::Sha1, vec![0; 20]))
///     .expect("referenced blob");
/// assert!(!referenced.is_inline());
/// assert_eq!(referenced.size(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    id: String,
    sizes: SizeTable,
    digests: DigestTable,
    data: Option<Vec<u8>>,
    transforms: Transforms,
}

impl Blob {
    /// Creates an inline blob.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if `data` is empty.
    pub fn inline(data: impl Into<Vec<u8>>) -> Result<Self, ValidationError> {
        Self::from_parts(BlobParts {
            data: Some(data.into()),
            ..BlobParts::default()
        })
    }

    /// Creates a referenced blob with empty size and digest tables.
    #[must_use]
    pub fn referenced(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sizes: SizeTable::new(),
            digests: DigestTable::new(),
            data: None,
            transforms: Transforms::new(),
        }
    }

    /// Creates a blob from raw parts, running structural validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn from_parts(parts: BlobParts) -> Result<Self, ValidationError> {
        let blob = Self {
            id: parts.id,
            sizes: parts.sizes,
            digests: parts.digests,
            data: parts.data,
            transforms: parts.transforms,
        };
        blob.validate_structure()?;
        Ok(blob)
    }

    /// Returns a copy with a size table entry added or replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is inline or the entry is out of range.
    pub fn with_size(mut self, compression: i64, size: i64) -> Result<Self, ValidationError> {
        self.sizes.insert(compression, size);
        self.validate_structure()?;
        Ok(self)
    }

    /// Returns a copy with a digest table entry added or replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is inline or the digest has the wrong
    /// length for `algorithm`.
    pub fn with_digest(
        mut self,
        compression: i64,
        algorithm: DigestAlgorithm,
        digest: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        self.digests
            .entry(compression)
            .or_default()
            .insert(algorithm.code(), digest);
        self.validate_structure()?;
        Ok(self)
    }

    /// Returns a copy with the transform pipeline replaced.
    ///
    /// # Errors
    ///
    /// Returns the first transform validation error.
    pub fn with_transforms(mut self, transforms: Transforms) -> Result<Self, ValidationError> {
        transforms.validate()?;
        self.transforms = transforms;
        Ok(self)
    }

    /// Returns a copy with the pipeline replaced by raw `(key code, payload)`
    /// entries, coerced into concrete transforms.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransformKey`] or the failing
    /// transform's error.
    pub fn with_raw_transforms(
        self,
        raw: impl IntoIterator<Item = (i64, TransformPayload)>,
    ) -> Result<Self, ValidationError> {
        let transforms = Transforms::from_raw(raw)?;
        self.with_transforms(transforms)
    }

    /// Returns `true` if the blob carries its bytes inline.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the external id (empty for inline blobs).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the size table.
    #[must_use]
    pub const fn sizes(&self) -> &SizeTable {
        &self.sizes
    }

    /// Returns the digest table.
    #[must_use]
    pub const fn digests(&self) -> &DigestTable {
        &self.digests
    }

    /// Returns the inline bytes.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Returns the transform pipeline.
    #[must_use]
    pub const fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// Returns the uncompressed size in bytes.
    ///
    /// Inline blobs report their data length; referenced blobs report the
    /// uncompressed size entry, or 0 when it is absent.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.data.as_ref().map_or_else(
            || {
                self.sizes
                    .get(&Compression::Null.code())
                    .copied()
                    .unwrap_or(0)
            },
            |data| i64::try_from(data.len()).unwrap_or(i64::MAX),
        )
    }

    /// Checks every invariant that does not need an external pattern.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate_structure(&self) -> Result<(), ValidationError> {
        if let Some(data) = self.data.as_ref() {
            return self.validate_inline(data);
        }

        self.validate_sizes()?;
        self.validate_digests()?;
        self.transforms.validate()
    }

    /// Checks every invariant, including the blob-id pattern for
    /// referenced blobs.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.validate_structure()?;

        if !self.is_inline() && !patterns.matches(PatternKind::BlobId, &self.id) {
            return Err(ValidationError::invalid_field(
                "blob id",
                &self.id,
                format!(
                    "a string matching '{}' when there is no inline data",
                    patterns.pattern(PatternKind::BlobId)
                ),
            ));
        }

        Ok(())
    }

    fn validate_inline(&self, data: &[u8]) -> Result<(), ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::invalid_field(
                "data",
                "<empty>",
                "a non-empty byte buffer",
            ));
        }
        if !self.id.is_empty() {
            return Err(ValidationError::InlineBlobNotEmpty { field: "id" });
        }
        if !self.sizes.is_empty() {
            return Err(ValidationError::InlineBlobNotEmpty { field: "sizes" });
        }
        if !self.digests.is_empty() {
            return Err(ValidationError::InlineBlobNotEmpty { field: "digests" });
        }
        Ok(())
    }

    fn validate_sizes(&self) -> Result<(), ValidationError> {
        for (&compression, &size) in &self.sizes {
            if compression < 0 {
                return Err(ValidationError::invalid_field(
                    "size key",
                    compression,
                    "a non-negative integer",
                ));
            }
            if !(1..=MAX_BLOB_SIZE).contains(&size) {
                return Err(ValidationError::invalid_field(
                    format!("size value for key {compression}"),
                    size,
                    format!("a positive integer no greater than {MAX_BLOB_SIZE}"),
                ));
            }
        }
        Ok(())
    }

    fn validate_digests(&self) -> Result<(), ValidationError> {
        for (&compression, digests) in &self.digests {
            for (&code, digest) in digests {
                let Some(algorithm) = DigestAlgorithm::from_code(code) else {
                    return Err(ValidationError::invalid_field(
                        format!("digest key under compression {compression}"),
                        code,
                        "one of [1 (sha1), 2 (sha224), 3 (sha256), 4 (sha512), 5 (sha384)]",
                    ));
                };
                if digest.len() != algorithm.digest_len() {
                    return Err(ValidationError::DigestLength {
                        compression,
                        algorithm: code,
                        actual: digest.len(),
                        expected: algorithm.digest_len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A blob list entry supplied either as a blob or as raw bytes.
///
/// Raw bytes become inline blobs when the owning entity is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobInput {
    /// An already-constructed blob.
    Blob(Blob),
    /// Raw bytes to wrap in an inline blob.
    Bytes(Vec<u8>),
}

impl From<Blob> for BlobInput {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Vec<u8>> for BlobInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Converts blob list entries into validated blobs.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBlob`] citing the offending index.
pub fn adapt_blobs(
    inputs: impl IntoIterator<Item = BlobInput>,
) -> Result<Vec<Blob>, ValidationError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let blob = match input {
                BlobInput::Blob(blob) => blob,
                BlobInput::Bytes(bytes) => Blob::inline(bytes)
                    .map_err(|source| ValidationError::at_blob(index, source))?,
            };
            blob.validate_structure()
                .map_err(|source| ValidationError::at_blob(index, source))?;
            Ok(blob)
        })
        .collect()
}

/// Deep-validates every blob of a list.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBlob`] citing the offending index.
pub fn validate_blobs(
    blobs: &[Blob],
    patterns: &dyn IdentifierPatterns,
) -> Result<(), ValidationError> {
    blobs.iter().enumerate().try_for_each(|(index, blob)| {
        blob.validate(patterns)
            .map_err(|source| ValidationError::at_blob(index, source))
    })
}
