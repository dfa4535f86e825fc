//! Message entities, validation and serialization for Missive.
//!
//! # Architecture
//!
//! - **Domain**: Entities ([`domain::Message`], [`domain::Blob`], [`domain::TextBody`], etc.)
//! - **Ports**: Collaborator interfaces ([`ports::patterns::IdentifierPatterns`],
//!   [`ports::blob_reader::BlobReader`], [`ports::validator::MessageValidator`])
//! - **Adapters**: [`adapters::regex_patterns::RegexPatterns`] and
//!   [`adapters::memory::InMemoryBlobStore`]
//! - **Validation**: Deep validation before a message is treated as trustworthy
//! - **Serialization**: Descriptive (keyed tree) and compact (positional binary) forms
//!
//! # Example
//!
//! ```
//! use missive::message::adapters::regex_patterns::RegexPatterns;
//! use missive::message::domain::{EmailAddress, Message};
//! use missive::message::ports::validator::MessageValidator;
//! use missive::message::validation::service::DefaultMessageValidator;
//!
//! let mut message = Message::new();
//! message.set_subject("Quarterly report").expect("subject header");
//! message
//!     .set_to(vec![EmailAddress::new("Ada", "ada@example.com").expect("address")])
//!     .expect("to header");
//! message.set_plain_text("Numbers attached.").expect("text body");
//!
//! let patterns = RegexPatterns::standard().expect("built-in patterns");
//! let validator = DefaultMessageValidator::new(patterns);
//! validator.validate(&message).expect("validation should pass");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod serialization;
pub mod validation;

#[cfg(test)]
mod tests;
