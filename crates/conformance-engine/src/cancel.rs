//! Shared cancellation signal for long-running validations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use conformance_client::{RequestTransport, TransportError, TransportResult};
use serde_json::Value;

/// Cloneable cancellation token checked before every outbound
/// request. A cancelled run surfaces as an aggregate failure, never a
/// partial report.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport wrapper that refuses new requests once its token fires.
///
/// Everything downstream of the orchestrator (executor, pagination
/// checks, identifier sampling) requests through this guard, so
/// in-flight work stops issuing GETs as soon as the run is cancelled
/// instead of draining its remaining page fetches against the
/// service.
pub(crate) struct CancelGuard<'a> {
    inner: &'a dyn RequestTransport,
    cancel: CancelToken,
}

impl<'a> CancelGuard<'a> {
    pub(crate) fn new(inner: &'a dyn RequestTransport, cancel: CancelToken) -> Self {
        Self { inner, cancel }
    }
}

#[async_trait]
impl RequestTransport for CancelGuard<'_> {
    async fn get(&self, url: &str) -> TransportResult<Value> {
        if self.cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        self.inner.get(url).await
    }
}
