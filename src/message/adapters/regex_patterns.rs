//! Regular-expression implementation of the `IdentifierPatterns` port.

use regex::Regex;
use serde::Deserialize;

use crate::message::{
    error::PatternError,
    ports::patterns::{IdentifierPatterns, PatternKind},
};

/// Default pattern for message uuids: a braced, hyphenated uuid.
pub const DEFAULT_UUID_PATTERN: &str =
    r"^\{[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}$";

/// Default pattern for external blob ids.
pub const DEFAULT_BLOB_ID_PATTERN: &str = r"^[A-Za-z0-9_-]{16,128}$";

/// Default pattern for strict address checking.
pub const DEFAULT_ADDRESS_PATTERN: &str = r"^[^\s@<>]+@[^\s@<>]+$";

/// Pattern sources, deserializable from host configuration.
///
/// Missing fields fall back to the defaults.
///
/// # Examples
///
/// ```
/// use missive::message::adapters::regex_patterns::{DEFAULT_UUID_PATTERN, PatternConfig};
///
/// let config: PatternConfig =
///     serde_json::from_str(r#"{"blob_id": "^[a-f0-9]{40}$"}"#).expect("valid config");
/// assert_eq!(config.blob_id, "^[a-f0-9]{40}$");
/// assert_eq!(config.uuid, DEFAULT_UUID_PATTERN);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Pattern for message uuids.
    pub uuid: String,
    /// Pattern for external blob ids.
    pub blob_id: String,
    /// Pattern for header addresses under strict validation.
    pub address: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            uuid: DEFAULT_UUID_PATTERN.to_owned(),
            blob_id: DEFAULT_BLOB_ID_PATTERN.to_owned(),
            address: DEFAULT_ADDRESS_PATTERN.to_owned(),
        }
    }
}

/// Identifier patterns backed by compiled regular expressions.
#[derive(Debug, Clone)]
pub struct RegexPatterns {
    uuid: Regex,
    blob_id: Regex,
    address: Regex,
}

impl RegexPatterns {
    /// Compiles the patterns of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] naming the first pattern that fails to compile.
    pub fn new(config: &PatternConfig) -> Result<Self, PatternError> {
        Ok(Self {
            uuid: compile(PatternKind::Uuid, &config.uuid)?,
            blob_id: compile(PatternKind::BlobId, &config.blob_id)?,
            address: compile(PatternKind::Address, &config.address)?,
        })
    }

    /// Compiles the default patterns.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a default pattern fails to compile.
    pub fn standard() -> Result<Self, PatternError> {
        Self::new(&PatternConfig::default())
    }

    const fn regex(&self, kind: PatternKind) -> &Regex {
        match kind {
            PatternKind::Uuid => &self.uuid,
            PatternKind::BlobId => &self.blob_id,
            PatternKind::Address => &self.address,
        }
    }
}

fn compile(kind: PatternKind, source: &str) -> Result<Regex, PatternError> {
    Regex::new(source).map_err(|source_err| PatternError {
        kind: kind.label(),
        source: source_err,
    })
}

impl IdentifierPatterns for RegexPatterns {
    fn matches(&self, kind: PatternKind, value: &str) -> bool {
        self.regex(kind).is_match(value)
    }

    fn pattern(&self, kind: PatternKind) -> String {
        self.regex(kind).as_str().to_owned()
    }
}
