//! In-memory transport serving canned responses for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};
use crate::transport::RequestTransport;

/// Transport that answers from a fixed URL-to-document map.
///
/// Lookup is exact-match first, then longest registered prefix, so a
/// single entry for `https://x.org/services` also answers the
/// paginated variants (`...?per_page=5&page=2`). Registered failures
/// take precedence over responses. Every requested URL is recorded
/// for assertions.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: HashMap<String, Value>,
    failures: HashMap<String, TransportError>,
    log: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response for a URL (or URL prefix).
    pub fn insert(&mut self, url: impl Into<String>, document: Value) -> &mut Self {
        self.responses.insert(url.into(), document);
        self
    }

    /// Register a canned failure for a URL (or URL prefix).
    pub fn insert_failure(&mut self, url: impl Into<String>, error: TransportError) -> &mut Self {
        self.failures.insert(url.into(), error);
        self
    }

    /// URLs requested so far, in request order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn longest_prefix<'a, T>(map: &'a HashMap<String, T>, url: &str) -> Option<&'a T> {
        map.iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, value)| value)
    }
}

#[async_trait]
impl RequestTransport for MemoryTransport {
    async fn get(&self, url: &str) -> TransportResult<Value> {
        if let Ok(mut log) = self.log.lock() {
            log.push(url.to_string());
        }

        if let Some(error) = self
            .failures
            .get(url)
            .or_else(|| Self::longest_prefix(&self.failures, url))
        {
            return Err(error.clone());
        }

        if let Some(document) = self
            .responses
            .get(url)
            .or_else(|| Self::longest_prefix(&self.responses, url))
        {
            return Ok(document.clone());
        }

        Err(TransportError::NotFound {
            url: url.to_string(),
        })
    }
}
