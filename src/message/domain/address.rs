//! Display name and address pairs carried by address headers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::{
    error::ValidationError,
    ports::patterns::{IdentifierPatterns, PatternKind},
};

/// An email address with an optional display name.
///
/// Address lists deduplicate entries by [`EmailAddress::address`] only; the
/// display name is treated as a mutable label of that address.
///
/// # Examples
///
/// ```
/// use missive::message::domain::EmailAddress;
///
/// let ada = EmailAddress::new("Ada", "ada@example.com").expect("valid address");
/// assert_eq!(ada.to_string(), "Ada <ada@example.com>");
/// assert!(EmailAddress::new("Ada", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    name: String,
    address: String,
}

impl EmailAddress {
    /// Creates a validated address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if `address` is empty.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Result<Self, ValidationError> {
        let candidate = Self {
            name: name.into(),
            address: address.into(),
        };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Creates a validated address without a display name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if `address` is empty.
    pub fn bare(address: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(String::new(), address)
    }

    /// Returns the display name, possibly empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Checks that the address is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] naming the address.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.address.is_empty() {
            return Err(ValidationError::invalid_field(
                "address",
                "<empty>",
                "a non-empty string",
            ));
        }
        Ok(())
    }

    /// Checks that the address also matches the host's address pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] naming the address and the
    /// pattern it failed.
    pub fn validate_format(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.validate()?;
        if !patterns.matches(PatternKind::Address, &self.address) {
            return Err(ValidationError::invalid_field(
                "address",
                &self.address,
                format!(
                    "a string matching '{}'",
                    patterns.pattern(PatternKind::Address)
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<{}>", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}
