//! Port trait definitions for the message subsystem.
//!
//! Ports define the abstract interfaces that the domain requires from the
//! hosting application. Adapters implement these ports to connect the domain
//! to pattern registries, blob stores and other infrastructure.

pub mod blob_reader;
pub mod patterns;
pub mod validator;

pub use blob_reader::{BlobReadResult, BlobReader};
pub use patterns::{IdentifierPatterns, PatternKind};
pub use validator::{MessageValidator, ValidationConfig, ValidationResult};
