//! Identifier pattern port.
//!
//! The message model checks uuids, blob ids and (in strict mode) header
//! addresses against host-supplied patterns. The host decides what those
//! patterns are; the domain only asks whether a value matches.

/// The identifier families checked against an external pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Message uuids.
    Uuid,
    /// External ids of referenced blobs.
    BlobId,
    /// Email addresses, checked only under strict validation.
    Address,
}

impl PatternKind {
    /// Returns a lowercase label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::BlobId => "blob id",
            Self::Address => "address",
        }
    }
}

/// Port for identifier pattern predicates.
///
/// # Implementation Notes
///
/// Implementations must be pure: the same `(kind, value)` always yields the
/// same answer, and no call has side effects.
#[cfg_attr(test, mockall::automock)]
pub trait IdentifierPatterns: Send + Sync {
    /// Returns `true` if `value` matches the pattern for `kind`.
    fn matches(&self, kind: PatternKind, value: &str) -> bool;

    /// Returns the pattern source for `kind`, used in error messages.
    fn pattern(&self, kind: PatternKind) -> String;
}
