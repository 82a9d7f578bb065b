//! Profile and schema stores for the HSDS-UK conformance validator.
//!
//! The engine loads one test profile per run and one JSON Schema per
//! test case. Both come through small store traits with filesystem
//! implementations; in-memory implementations back the tests.

pub mod error;
pub mod filesystem;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use filesystem::{FileProfileStore, FileSchemaStore};
pub use memory::{MemoryProfileStore, MemorySchemaStore};
pub use store::{ProfileStore, SchemaStore};
