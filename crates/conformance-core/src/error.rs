//! Error types for core model operations.

use thiserror::Error;

/// Result type alias for core model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while working with the core model.
#[derive(Error, Debug)]
pub enum Error {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A paged response did not match the expected wire shape
    #[error("Invalid page document: {0}")]
    InvalidPage(String),

    /// A version token outside the recognized set
    #[error("Unrecognized standard version: {0}")]
    UnknownVersion(String),
}

impl Error {
    /// Create an invalid page error
    pub fn invalid_page(message: impl Into<String>) -> Self {
        Self::InvalidPage(message.into())
    }

    /// Create an unknown version error
    pub fn unknown_version(token: impl Into<String>) -> Self {
        Self::UnknownVersion(token.into())
    }
}
