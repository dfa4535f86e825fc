//! Missive: structured electronic-message data model.
//!
//! This crate provides the core entities of a mail store: content-addressed
//! blobs with transform pipelines, polymorphic message bodies, a header
//! taxonomy normalizer, and the `Message` aggregate that enforces the
//! cross-field invariants between them.
//!
//! # Architecture
//!
//! Missive follows hexagonal architecture principles:
//!
//! - **Domain**: Pure entities with validating constructors and setters
//! - **Ports**: Trait interfaces for host collaborators (patterns, blob reads)
//! - **Adapters**: Concrete collaborator implementations (regex, in-memory)
//!
//! # Modules
//!
//! - [`message`]: Message entities, validation and serialization

pub mod message;
