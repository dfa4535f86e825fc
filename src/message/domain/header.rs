//! Header taxonomy.
//!
//! Every header name belongs to exactly one [`HeaderShape`], matched
//! case-insensitively. The shape decides how the value is validated,
//! replaced and merged. Names outside the known tables are arbitrary
//! single-string headers.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, SeqAccess, Visitor},
    ser::SerializeTuple,
};
use tracing::debug;

use crate::message::{error::ValidationError, ports::patterns::IdentifierPatterns};

use super::address::EmailAddress;

const SINGLE_STRING_HEADERS: &[&str] = &["in-reply-to", "subject"];

const SINGLE_ADDRESS_HEADERS: &[&str] = &[
    "return-path",
    "sender",
    "resent-sender",
    "disposition-notification-to",
];

const ADDRESS_LIST_HEADERS: &[&str] = &[
    "from",
    "to",
    "cc",
    "bcc",
    "reply-to",
    "resent-from",
    "resent-to",
    "resent-cc",
    "resent-bcc",
    "resent-reply-to",
];

const STRING_LIST_HEADERS: &[&str] = &["references"];

/// Shape class of a header value.
///
/// # Examples
///
/// ```
/// use missive::message::domain::HeaderShape;
///
/// assert_eq!(HeaderShape::classify("Resent-Cc"), HeaderShape::AddressList);
/// assert_eq!(HeaderShape::classify("X-Mailer"), HeaderShape::SingleString);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderShape {
    /// A plain string, e.g. `Subject`.
    SingleString,
    /// One address, e.g. `Sender`.
    SingleAddress,
    /// A non-empty address list deduplicated by address, e.g. `To`.
    AddressList,
    /// A non-empty list of strings, e.g. `References`.
    StringList,
}

impl HeaderShape {
    /// Classifies a header name, ignoring case.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let listed = |table: &[&str]| table.contains(&lower.as_str());

        if listed(SINGLE_ADDRESS_HEADERS) {
            Self::SingleAddress
        } else if listed(ADDRESS_LIST_HEADERS) {
            Self::AddressList
        } else if listed(STRING_LIST_HEADERS) {
            Self::StringList
        } else {
            Self::SingleString
        }
    }

    /// Returns `true` if `name` is one of the well-known single-string
    /// headers rather than an arbitrary one.
    #[must_use]
    pub fn is_known_single_string(name: &str) -> bool {
        SINGLE_STRING_HEADERS.contains(&name.to_ascii_lowercase().as_str())
    }
}

impl fmt::Display for HeaderShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SingleString => "single-string",
            Self::SingleAddress => "single-address",
            Self::AddressList => "address-list",
            Self::StringList => "string-list",
        };
        f.write_str(label)
    }
}

/// A header value.
///
/// Serialized untagged: the shape is recovered from the header name when
/// decoding (see [`HeaderValue::conform_to`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// A plain string.
    Text(String),
    /// A list of strings.
    TextList(Vec<String>),
    /// A list of addresses.
    AddressList(Vec<EmailAddress>),
    /// A single address.
    Address(EmailAddress),
}

impl HeaderValue {
    /// Returns the shape class this value naturally belongs to.
    #[must_use]
    pub const fn shape(&self) -> HeaderShape {
        match self {
            Self::Text(_) => HeaderShape::SingleString,
            Self::TextList(_) => HeaderShape::StringList,
            Self::AddressList(_) => HeaderShape::AddressList,
            Self::Address(_) => HeaderShape::SingleAddress,
        }
    }

    /// Reinterprets a decoded value for the shape its header name requires.
    ///
    /// Positional encodings cannot distinguish a single address from a
    /// two-element string list; this resolves the pair for single-address
    /// names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHeader`] if the value cannot
    /// represent `shape`, including an empty list for an address-list name.
    pub fn conform_to(self, name: &str, shape: HeaderShape) -> Result<Self, ValidationError> {
        match (shape, self) {
            (HeaderShape::SingleString, value @ Self::Text(_))
            | (HeaderShape::StringList, value @ Self::TextList(_))
            | (HeaderShape::AddressList, value @ Self::AddressList(_))
            | (HeaderShape::SingleAddress, value @ Self::Address(_)) => Ok(value),
            (HeaderShape::AddressList, Self::TextList(items)) if items.is_empty() => {
                Err(empty_address_list(name))
            }
            (HeaderShape::SingleAddress, Self::TextList(items)) => {
                let mut parts = items.into_iter();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(display), Some(address), None) => {
                        Ok(Self::Address(EmailAddress::new(display, address)?))
                    }
                    _ => Err(mismatched_value(name, shape)),
                }
            }
            _ => Err(mismatched_value(name, shape)),
        }
    }
}

fn mismatched_value(name: &str, shape: HeaderShape) -> ValidationError {
    ValidationError::invalid_header(name, format!("value must have the {shape} shape"))
}

pub(crate) fn empty_address_list(name: &str) -> ValidationError {
    ValidationError::invalid_header(name, "must be a non-empty list of addresses")
}

/// Address checking applied while validating headers.
#[derive(Clone, Copy)]
pub enum HeaderValidation<'a> {
    /// Addresses only need a non-empty address (inbound).
    Lenient,
    /// Addresses must also match the address pattern (outbound).
    Strict(&'a dyn IdentifierPatterns),
}

impl fmt::Debug for HeaderValidation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("Lenient"),
            Self::Strict(_) => f.write_str("Strict"),
        }
    }
}

impl HeaderValidation<'_> {
    fn check(self, address: &EmailAddress) -> Result<(), ValidationError> {
        match self {
            Self::Lenient => address.validate(),
            Self::Strict(patterns) => address.validate_format(patterns),
        }
    }
}

/// A `(name, value)` header entry.
///
/// Serialized as a two-element array `[name, value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: HeaderValue,
}

impl Header {
    /// Creates a header entry without validating it.
    #[must_use]
    pub fn new(name: impl Into<String>, value: HeaderValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the header name as supplied.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the header value.
    #[must_use]
    pub const fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// Returns the shape class of this header's name.
    #[must_use]
    pub fn shape(&self) -> HeaderShape {
        HeaderShape::classify(&self.name)
    }

    /// Returns `true` if this header's name equals `name`, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub(crate) const fn value_mut(&mut self) -> &mut HeaderValue {
        &mut self.value
    }

    pub(crate) fn set_value(&mut self, value: HeaderValue) {
        self.value = value;
    }

    /// Reinterprets the value for the shape of the header name.
    ///
    /// Address lists are also deduplicated by address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHeader`] if the value cannot be
    /// reinterpreted.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let shape = self.shape();
        let value = match self.value.conform_to(&self.name, shape)? {
            HeaderValue::AddressList(addresses) => {
                HeaderValue::AddressList(dedup_addresses(addresses))
            }
            other => other,
        };
        Ok(Self {
            name: self.name,
            value,
        })
    }

    /// Validates the entry against the taxonomy.
    ///
    /// # Errors
    ///
    /// Returns the first violation, naming the header.
    pub fn validate(&self, mode: HeaderValidation<'_>) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::invalid_header(
                "",
                "name must be a non-empty string",
            ));
        }

        let shape = self.shape();
        match (shape, &self.value) {
            (HeaderShape::SingleAddress, HeaderValue::Address(address)) => {
                debug!(header = %self.name, %address, "validating address header");
                mode.check(address).map_err(|err| self.reject(&err))
            }
            (HeaderShape::AddressList, HeaderValue::AddressList(addresses)) => {
                if addresses.is_empty() {
                    return Err(empty_address_list(&self.name));
                }
                debug!(header = %self.name, count = addresses.len(), "validating address list header");
                addresses
                    .iter()
                    .try_for_each(|address| mode.check(address))
                    .map_err(|err| self.reject(&err))
            }
            (HeaderShape::StringList, HeaderValue::TextList(items)) => {
                if items.is_empty() {
                    Err(ValidationError::invalid_header(
                        &self.name,
                        "must be a non-empty list of strings",
                    ))
                } else {
                    Ok(())
                }
            }
            (HeaderShape::SingleString, HeaderValue::Text(_)) => Ok(()),
            _ => Err(mismatched_value(&self.name, shape)),
        }
    }

    fn reject(&self, cause: &ValidationError) -> ValidationError {
        ValidationError::invalid_header(&self.name, cause.to_string())
    }
}

impl Serialize for Header {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeaderVisitor;

        impl<'de> Visitor<'de> for HeaderVisitor {
            type Value = Header;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [name, value] header entry")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Header, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let value: HeaderValue = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Header { name, value })
            }
        }

        deserializer.deserialize_seq(HeaderVisitor)
    }
}

/// Deduplicates addresses by address.
///
/// The first occurrence keeps its position; later duplicates only replace
/// its display name.
#[must_use]
pub fn dedup_addresses(addresses: Vec<EmailAddress>) -> Vec<EmailAddress> {
    let mut unique = Vec::with_capacity(addresses.len());
    merge_addresses(&mut unique, addresses);
    unique
}

/// Merges `additions` into `existing` using the dedup-by-address rule.
///
/// Unknown addresses are appended; known ones have their name updated.
pub fn merge_addresses(existing: &mut Vec<EmailAddress>, additions: Vec<EmailAddress>) {
    for addition in additions {
        if let Some(known) = existing
            .iter_mut()
            .find(|known| known.address() == addition.address())
        {
            known.set_name(addition.name());
        } else {
            existing.push(addition);
        }
    }
}
