//! In-memory implementation of the `BlobReader` port.
//!
//! Provides a simple, thread-safe blob store for unit testing
//! without a mail store. Not suitable for production use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::message::{
    domain::{Blob, BlobTransform, TransformKey},
    error::LookupError,
    ports::blob_reader::{BlobReadResult, BlobReader},
};

/// Read failure code for a poisoned store lock.
pub const READ_FAILURE_LOCK: i32 = 1;

/// Read failure code for a transform window outside the stored bytes.
pub const READ_FAILURE_WINDOW: i32 = 2;

/// In-memory implementation of [`BlobReader`].
///
/// Inline blobs return their own bytes. Referenced blobs are looked up by
/// id and cut to their offset and length transforms; other transforms are
/// not executed.
///
/// Thread-safe via internal [`RwLock`]. Intended for tests and local tooling.
///
/// # Example
///
/// ```
/// use missive::message::adapters::memory::InMemoryBlobStore;
/// use missive::message::domain::Blob;
/// use missive::message::ports::blob_reader::BlobReader;
///
/// let store = InMemoryBlobStore::new();
/// store.insert("Zm9vYmFyYmF6cXV4MDAx", b"hello world".to_vec()).expect("store");
///
/// let blob = Blob::referenced("Zm9vYmFyYmF6cXV4MDAx");
/// assert_eq!(store.read(&blob).expect("stored"), b"hello world".to_vec());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores content under `id`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::BlobRead`] if the internal lock is poisoned.
    pub fn insert(&self, id: impl Into<String>, content: Vec<u8>) -> BlobReadResult<()> {
        let key = id.into();
        let mut guard = self.blobs.write().map_err(|e| {
            LookupError::blob_read(key.clone(), READ_FAILURE_LOCK, format!("lock poisoned: {e}"))
        })?;
        guard.insert(key, content);
        Ok(())
    }

    /// Returns the number of stored blobs.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no blobs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobReader for InMemoryBlobStore {
    fn read(&self, blob: &Blob) -> BlobReadResult<Vec<u8>> {
        if let Some(data) = blob.data() {
            return Ok(data.to_vec());
        }

        let guard = self.blobs.read().map_err(|e| {
            LookupError::blob_read(blob.id(), READ_FAILURE_LOCK, format!("lock poisoned: {e}"))
        })?;
        let stored = guard
            .get(blob.id())
            .ok_or_else(|| LookupError::not_found_of_type(blob.id(), "Blob"))?;

        window(blob, stored).map(<[u8]>::to_vec)
    }
}

fn window<'a>(blob: &Blob, stored: &'a [u8]) -> BlobReadResult<&'a [u8]> {
    let transforms = blob.transforms();
    let offset = match transforms.get(TransformKey::Offset) {
        Some(BlobTransform::Offset(value)) => to_index(blob, *value)?,
        _ => 0,
    };
    let tail = stored.get(offset..).ok_or_else(|| {
        LookupError::blob_read(
            blob.id(),
            READ_FAILURE_WINDOW,
            format!("offset {offset} exceeds stored size {}", stored.len()),
        )
    })?;

    match transforms.get(TransformKey::Length) {
        Some(BlobTransform::Length(value)) => {
            let length = to_index(blob, *value)?;
            tail.get(..length).ok_or_else(|| {
                LookupError::blob_read(
                    blob.id(),
                    READ_FAILURE_WINDOW,
                    format!("length {length} exceeds remaining size {}", tail.len()),
                )
            })
        }
        _ => Ok(tail),
    }
}

fn to_index(blob: &Blob, value: i64) -> BlobReadResult<usize> {
    usize::try_from(value).map_err(|e| {
        LookupError::blob_read(blob.id(), READ_FAILURE_WINDOW, format!("invalid window: {e}"))
    })
}
