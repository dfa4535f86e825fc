//! Adapters for the message module.
//!
//! This module provides concrete implementations of the collaborator ports,
//! following hexagonal architecture principles. Adapters handle all
//! infrastructure concerns while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`regex_patterns::RegexPatterns`]: Identifier patterns compiled from
//!   a [`regex_patterns::PatternConfig`]
//! - [`memory::InMemoryBlobStore`]: Thread-safe in-memory blob content for
//!   unit testing

pub mod memory;
pub mod regex_patterns;
