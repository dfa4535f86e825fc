//! Per-folder local state.
//!
//! Folder state never leaves the process: it is excluded from every
//! serialized form.

use std::collections::BTreeMap;

/// Opaque string attributes a folder keeps about a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAttributes(BTreeMap<String, String>);

impl MessageAttributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with an attribute set.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the attribute stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MessageAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// The state a message has within one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderState {
    attributes: MessageAttributes,
}

impl FolderState {
    /// Creates a folder state from attributes.
    #[must_use]
    pub const fn new(attributes: MessageAttributes) -> Self {
        Self { attributes }
    }

    /// Returns the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &MessageAttributes {
        &self.attributes
    }
}
