//! Error types for profile and schema store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures while loading a profile or schema. Any of these is
/// terminal for the validation run that requested the document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named profile or schema does not exist.
    #[error("Not found: {name}")]
    NotFound { name: String },

    /// The document exists but could not be read.
    #[error("I/O error reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not valid JSON of the expected
    /// shape.
    #[error("Could not parse {name}: {message}")]
    Parse { name: String, message: String },
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }

    pub fn parse(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            name: name.into(),
            message: message.into(),
        }
    }
}
