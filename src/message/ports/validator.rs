//! Validator port for message validation.
//!
//! Defines the abstract interface for validating messages at different layers.

use crate::message::{domain::Message, error::ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Port for message validation operations.
///
/// Validation occurs in layers:
/// 1. Structure validation (uuid, header taxonomy, content-id uniqueness)
/// 2. Content validation (bodies, blobs, attachments)
///
/// # Implementation Notes
///
/// Implementations should:
/// - Fail fast, returning the first violation found
/// - Be stateless and thread-safe
pub trait MessageValidator: Send + Sync {
    /// Validates a message against all rules.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    fn validate(&self, message: &Message) -> ValidationResult<()>;

    /// Validates only the structural aspects of a message.
    ///
    /// Checks:
    /// - The uuid matches the uuid pattern
    /// - Every header has a non-empty name and a value of its shape
    /// - Body content-ids are pairwise distinct
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if structural validation fails.
    fn validate_structure(&self, message: &Message) -> ValidationResult<()>;

    /// Validates the bodies and attachments of a message.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if content validation fails.
    fn validate_content(&self, message: &Message) -> ValidationResult<()>;
}

/// Configuration for validation rules.
///
/// Inbound messages are accepted leniently; outbound messages additionally
/// require header addresses to match the address pattern and attachments to
/// carry a name and type.
///
/// # Examples
///
/// ```
/// use missive::message::ports::validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert!(!config.strict_addresses);
///
/// let outbound = ValidationConfig::outbound();
/// assert!(outbound.strict_addresses);
/// assert!(outbound.strict_attachments);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Whether header addresses must match the address pattern.
    pub strict_addresses: bool,
    /// Whether attachments must carry a non-empty name and type.
    pub strict_attachments: bool,
}

impl ValidationConfig {
    /// Creates the lenient configuration used for inbound messages.
    #[must_use]
    pub const fn inbound() -> Self {
        Self {
            strict_addresses: false,
            strict_attachments: false,
        }
    }

    /// Creates the strict configuration used before outbound transmission.
    #[must_use]
    pub const fn outbound() -> Self {
        Self {
            strict_addresses: true,
            strict_attachments: true,
        }
    }
}
