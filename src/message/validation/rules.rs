//! Individual validation rule implementations.
//!
//! Each rule is implemented as a pure function that validates a specific
//! aspect of a message. Rules return `Ok(())` on success or a specific
//! `ValidationError` on failure.

use std::collections::BTreeSet;

use crate::message::{
    domain::{HeaderValidation, Message},
    error::ValidationError,
    ports::{patterns::IdentifierPatterns, validator::ValidationConfig},
};

/// Validates that the uuid matches the uuid pattern.
///
/// # Errors
///
/// Returns `ValidationError::InvalidField` naming the uuid.
pub fn validate_uuid(
    message: &Message,
    patterns: &dyn IdentifierPatterns,
) -> Result<(), ValidationError> {
    message.validate_uuid(patterns)
}

/// Validates every header against the taxonomy.
///
/// Addresses must match the address pattern when
/// [`ValidationConfig::strict_addresses`] is set.
///
/// # Errors
///
/// Returns the first invalid header.
pub fn validate_headers(
    message: &Message,
    patterns: &dyn IdentifierPatterns,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    let mode = if config.strict_addresses {
        HeaderValidation::Strict(patterns)
    } else {
        HeaderValidation::Lenient
    };
    message.validate_headers(mode)
}

/// Validates that body content-ids are pairwise distinct.
///
/// # Errors
///
/// Returns `ValidationError::DuplicateContentId` for the first repeated id.
pub fn validate_content_ids(message: &Message) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for body in message.bodies() {
        let content_id = body.content_id();
        if !content_id.is_empty() && !seen.insert(content_id) {
            return Err(ValidationError::DuplicateContentId(content_id.to_owned()));
        }
    }
    Ok(())
}

/// Validates every body, including blob ids.
///
/// # Errors
///
/// Returns the first body validation error.
pub fn validate_bodies(
    message: &Message,
    patterns: &dyn IdentifierPatterns,
) -> Result<(), ValidationError> {
    message
        .bodies()
        .try_for_each(|body| body.validate(patterns))
}

/// Validates every attachment.
///
/// Attachments must carry a name and type when
/// [`ValidationConfig::strict_attachments`] is set.
///
/// # Errors
///
/// Returns the first attachment validation error.
pub fn validate_attachments(
    message: &Message,
    patterns: &dyn IdentifierPatterns,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    message.attachments().iter().try_for_each(|attachment| {
        if config.strict_attachments {
            attachment.validate_strict(patterns)
        } else {
            attachment.validate(patterns)
        }
    })
}
