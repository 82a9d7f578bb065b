//! Core data structures for HSDS-UK conformance validation.
//!
//! This crate defines the shared vocabulary of the validator: the
//! recognized standard versions, the declarative test profile model,
//! the version-polymorphic paged-response shape, and the hierarchical
//! report produced by a validation run.

pub mod error;
pub mod issue;
pub mod page;
pub mod profile;
pub mod report;
pub mod version;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use issue::Issue;
pub use page::Page;
pub use profile::{MessageLevel, TestCaseDefinition, TestGroupDefinition, TestProfile};
pub use report::{ServiceDetails, TestGroupResult, TestResult, ValidationReport};
pub use version::StandardVersion;
