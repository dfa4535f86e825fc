//! Blob content port.
//!
//! Reading referenced blob content is the job of the hosting mail store.
//! The domain validates blob descriptors but never fetches bytes itself.

use crate::message::{domain::Blob, error::LookupError};

/// Result type for blob read operations.
pub type BlobReadResult<T> = Result<T, LookupError>;

/// Port for resolving blob descriptors into bytes.
pub trait BlobReader: Send + Sync {
    /// Returns the bytes a blob describes.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] when a referenced id is unknown and
    /// [`LookupError::BlobRead`] when the content cannot be produced.
    fn read(&self, blob: &Blob) -> BlobReadResult<Vec<u8>>;
}
