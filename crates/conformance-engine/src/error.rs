//! Error types for the validation engine.
//!
//! Only three failures may abort a whole run: an invalid input URL, a
//! profile that cannot be loaded, and external cancellation. Every
//! other failure is contained inside the run and reported as data.

use conformance_profiles::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Terminal failures of a validation run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input was not an absolute http/https URL.
    #[error("Invalid URL provided: {url}")]
    InvalidUrl { url: String },

    /// The selected test profile could not be loaded, so no test
    /// groups can be constructed.
    #[error("Could not load test profile {name}: {source}")]
    ProfileLoad {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The run was cancelled from outside.
    #[error("Validation run was cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn profile_load(name: impl Into<String>, source: StoreError) -> Self {
        Self::ProfileLoad {
            name: name.into(),
            source,
        }
    }
}
