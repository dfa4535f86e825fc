//! Unit tests for the message module.
//!
//! Tests are organised by domain concept, covering happy paths, error cases,
//! and edge cases for all public APIs.

mod adapters_tests;
mod body_tests;
mod message_tests;
mod transform_tests;
mod validation_tests;
