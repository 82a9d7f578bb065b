//! The transport contract the validation engine depends on.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportResult;

/// GET a URL and return the response body as JSON.
///
/// Implementations may cache, retry or throttle internally; the
/// engine only sees a call that takes longer. On non-2xx or network
/// failure the returned error carries a human-readable reason.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    async fn get(&self, url: &str) -> TransportResult<Value>;
}
