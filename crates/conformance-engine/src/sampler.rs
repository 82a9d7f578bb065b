//! Identifier sampling from collection endpoints.
//!
//! Detail-endpoint tests need real identifiers to request. Rather
//! than always testing page 1, item 1, the sampler picks items
//! uniformly at random across randomly chosen pages, so defects
//! specific to particular records or deep pages still surface.

use conformance_client::{RequestTransport, TransportError};
use conformance_core::{Page, StandardVersion};
use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::rng_from_seed;

/// Sampling failed outright. Best-effort shortfalls (fewer ids than
/// requested) are not errors.
#[derive(Error, Debug)]
pub enum SampleError {
    /// The collection endpoint could not be fetched at all.
    #[error("Could not reach collection endpoint: {0}")]
    Unreachable(TransportError),

    /// The first page did not match the expected wire shape.
    #[error("Invalid page document: {0}")]
    Page(String),
}

/// Samples a small set of item identifiers from a paged collection.
pub struct IdSampler<'a> {
    transport: &'a dyn RequestTransport,
    version: StandardVersion,
    rng: SmallRng,
}

impl<'a> IdSampler<'a> {
    pub fn new(
        transport: &'a dyn RequestTransport,
        version: StandardVersion,
        seed: Option<u64>,
    ) -> Self {
        Self {
            transport,
            version,
            rng: rng_from_seed(seed),
        }
    }

    /// Collect up to `limit` item identifiers from the collection at
    /// `base_url + endpoint`. Returns fewer ids, or none, rather than
    /// failing, except when the collection is outright unreachable.
    pub async fn sample_ids(
        &mut self,
        base_url: &str,
        endpoint: &str,
        limit: usize,
    ) -> Result<Vec<String>, SampleError> {
        let first_url = page_url(base_url, endpoint, 1);
        let document = self
            .transport
            .get(&first_url)
            .await
            .map_err(SampleError::Unreachable)?;
        let first = Page::decode(self.version, &document)
            .map_err(|e| SampleError::Page(e.to_string()))?;

        // A single short page is sampled exhaustively; fetching
        // further pages would be pointless.
        if first.last_page && first.item_count() < limit {
            return Ok(first.contents.iter().filter_map(Page::item_id).take(limit).collect());
        }

        let total_pages = first.total_pages.max(1);
        let max_fetches = limit * 3;
        let mut ids = Vec::with_capacity(limit);
        let mut page = first;
        let mut fetches = 0;

        loop {
            if !page.contents.is_empty() {
                let pick = self.rng.random_range(0..page.contents.len());
                if let Some(id) = Page::item_id(&page.contents[pick]) {
                    ids.push(id);
                }
            }

            if ids.len() >= limit || fetches >= max_fetches {
                break;
            }

            // Not necessarily monotonic: any page may come next.
            let next = self.rng.random_range(1..=total_pages);
            let url = page_url(base_url, endpoint, next);
            fetches += 1;

            let document = match self.transport.get(&url).await {
                Ok(document) => document,
                Err(err) => {
                    debug!(url, %err, "page fetch failed, ending sampling");
                    break;
                }
            };
            page = match Page::decode(self.version, &document) {
                Ok(page) => page,
                Err(err) => {
                    debug!(url, %err, "page decode failed, ending sampling");
                    break;
                }
            };
        }

        Ok(ids)
    }
}

fn page_url(base_url: &str, endpoint: &str, page: i64) -> String {
    format!("{base_url}{endpoint}?page={page}")
}
