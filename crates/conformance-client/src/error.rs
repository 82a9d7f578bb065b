//! Error types for transport operations.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures a transport call can surface. Every variant renders to a
/// human-readable reason suitable for inclusion in a report issue.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The service answered with a non-2xx status.
    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    /// The request could not be completed at the network level.
    #[error("Request failed: {message}")]
    Network { message: String },

    /// The response body was not valid JSON.
    #[error("Response was not valid JSON: {message}")]
    Decode { message: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// No canned response registered for the URL (memory transport).
    #[error("No response registered for {url}")]
    NotFound { url: String },

    /// The request was refused because its run was cancelled.
    #[error("Request cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            status,
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether a retry could plausibly succeed. Client errors are
    /// final; server errors, timeouts and network failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Decode { .. } | Self::NotFound { .. } | Self::Cancelled => false,
        }
    }
}
