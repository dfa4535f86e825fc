//! Message identifiers.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::message::error::ValidationError;

/// Uuid carried by a message that has not been assigned one.
pub const NIL_MESSAGE_UUID: &str = "{00000000-0000-0000-0000-000000000000}";

/// Returns a fresh random uuid in braced form.
///
/// # Examples
///
/// ```
/// use missive::message::domain::generate_message_uuid;
///
/// let uuid = generate_message_uuid();
/// assert!(uuid.starts_with('{') && uuid.ends_with('}'));
/// assert_eq!(uuid.len(), 38);
/// ```
#[must_use]
pub fn generate_message_uuid() -> String {
    format!("{{{}}}", Uuid::new_v4())
}

/// Content-ids in use by a message's body slots.
///
/// Fresh ids come from a counter that does not consult the registry, so a
/// generated id can still collide with one supplied by the caller. Decoded
/// messages move the counter past the numeric ids they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentIdRegistry {
    in_use: BTreeSet<String>,
    next: u64,
}

impl ContentIdRegistry {
    /// Returns the next counter value as a decimal string.
    pub fn next_content_id(&mut self) -> String {
        let id = self.next.to_string();
        self.next = self.next.saturating_add(1);
        id
    }

    /// Registers `content_id`, releasing `replacing` if given.
    ///
    /// The id being replaced does not count as a collision.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateContentId`] if another slot holds
    /// the id; the registry is unchanged.
    pub fn claim(&mut self, content_id: &str, replacing: Option<&str>) -> Result<(), ValidationError> {
        if replacing != Some(content_id) && self.in_use.contains(content_id) {
            return Err(ValidationError::DuplicateContentId(content_id.to_owned()));
        }
        if let Some(previous) = replacing {
            self.in_use.remove(previous);
        }
        self.in_use.insert(content_id.to_owned());
        Ok(())
    }

    /// Moves the counter past every registered decimal id.
    pub fn skip_registered(&mut self) {
        if let Some(highest) = self
            .in_use
            .iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
        {
            self.next = self.next.max(highest.saturating_add(1));
        }
    }

    /// Releases `content_id`.
    pub fn release(&mut self, content_id: &str) {
        self.in_use.remove(content_id);
    }

    /// Returns `true` if `content_id` is registered.
    #[must_use]
    pub fn contains(&self, content_id: &str) -> bool {
        self.in_use.contains(content_id)
    }
}
