//! Validation service implementation.
//!
//! Provides the default implementation of the `MessageValidator` port,
//! combining individual validation rules into a single validator.

use crate::message::{
    domain::Message,
    ports::{
        patterns::IdentifierPatterns,
        validator::{MessageValidator, ValidationConfig, ValidationResult},
    },
    validation::rules,
};

/// Default implementation of the message validator.
///
/// Applies all validation rules in order and stops at the first error.
///
/// # Examples
///
/// ```
/// use missive::message::adapters::regex_patterns::RegexPatterns;
/// use missive::message::domain::{EmailAddress, Message};
/// use missive::message::ports::validator::{MessageValidator, ValidationConfig};
/// use missive::message::validation::service::DefaultMessageValidator;
///
/// let mut message = Message::new();
/// message
///     .set_to(vec![EmailAddress::new("", "not an address").expect("non-empty")])
///     .expect("lenient header");
///
/// let patterns = RegexPatterns::standard().expect("built-in patterns");
/// let inbound = DefaultMessageValidator::new(patterns.clone());
/// assert!(inbound.validate(&message).is_ok());
///
/// let outbound = DefaultMessageValidator::with_config(ValidationConfig::outbound(), patterns);
/// assert!(outbound.validate(&message).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DefaultMessageValidator<P> {
    config: ValidationConfig,
    patterns: P,
}

impl<P: IdentifierPatterns> DefaultMessageValidator<P> {
    /// Creates a new validator with default (inbound) configuration.
    #[must_use]
    pub fn new(patterns: P) -> Self {
        Self {
            config: ValidationConfig::default(),
            patterns,
        }
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: ValidationConfig, patterns: P) -> Self {
        Self { config, patterns }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Returns the identifier patterns.
    #[must_use]
    pub const fn patterns(&self) -> &P {
        &self.patterns
    }
}

impl<P: IdentifierPatterns> MessageValidator for DefaultMessageValidator<P> {
    fn validate(&self, message: &Message) -> ValidationResult<()> {
        self.validate_structure(message)?;
        self.validate_content(message)
    }

    fn validate_structure(&self, message: &Message) -> ValidationResult<()> {
        rules::validate_uuid(message, &self.patterns)?;
        rules::validate_headers(message, &self.patterns, &self.config)?;
        rules::validate_content_ids(message)
    }

    fn validate_content(&self, message: &Message) -> ValidationResult<()> {
        rules::validate_bodies(message, &self.patterns)?;
        rules::validate_attachments(message, &self.patterns, &self.config)
    }
}

// Note: Unit tests for DefaultMessageValidator are located in
// src/message/tests/validation_tests.rs using rstest fixtures and
// mockall pattern doubles.
