//! HTTP transport backed by reqwest.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, warn};

use crate::error::{TransportError, TransportResult};
use crate::transport::RequestTransport;

/// Resource policy for outbound requests.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Per-call timeout.
    pub request_timeout: Duration,
    /// Retries after the initial attempt, for retryable failures only.
    pub max_retries: u32,
    /// Base delay before the first retry; doubles per attempt.
    pub retry_base_delay: Duration,
    /// Cap on simultaneous outbound requests across all runs.
    pub max_concurrent_requests: usize,
    /// Cache successful responses by URL for the transport's lifetime.
    pub cache_responses: bool,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
            max_concurrent_requests: 8,
            cache_responses: true,
        }
    }
}

/// Transport that issues real HTTP GETs, applying timeout, bounded
/// retry with exponential backoff, an in-memory response cache and a
/// semaphore cap on concurrency. All of it is transparent to the
/// engine: a throttled or retried call just takes longer.
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
    cache: RwLock<HashMap<String, Value>>,
    governor: Semaphore,
}

impl HttpTransport {
    /// Create a transport with the default resource policy.
    pub fn new() -> TransportResult<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with a custom resource policy.
    pub fn with_config(config: HttpTransportConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;

        Ok(Self {
            client,
            governor: Semaphore::new(config.max_concurrent_requests),
            cache: RwLock::new(HashMap::new()),
            config,
        })
    }

    async fn fetch_once(&self, url: &str) -> TransportResult<Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    seconds: self.config.request_timeout.as_secs(),
                }
            } else {
                TransportError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(TransportError::status(status.as_u16(), reason));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::decode(e.to_string()))
    }
}

#[async_trait]
impl RequestTransport for HttpTransport {
    async fn get(&self, url: &str) -> TransportResult<Value> {
        if self.config.cache_responses {
            if let Some(cached) = self.cache.read().await.get(url) {
                debug!(url, "serving response from cache");
                return Ok(cached.clone());
            }
        }

        // Hold the permit for the whole attempt sequence so retries
        // do not multiply outbound pressure.
        let _permit = self
            .governor
            .acquire()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let mut delay = self.config.retry_base_delay;
        let mut attempt = 0;
        let value = loop {
            match self.fetch_once(url).await {
                Ok(value) => break value,
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(url, attempt, %err, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => return Err(err),
            }
        };

        if self.config.cache_responses {
            self.cache
                .write()
                .await
                .insert(url.to_string(), value.clone());
        }

        Ok(value)
    }
}
