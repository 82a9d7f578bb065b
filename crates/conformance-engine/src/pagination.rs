//! Pagination invariant checking.
//!
//! Fetches a bounded sample of pages from a paged collection endpoint
//! and checks that the pagination metadata is internally consistent:
//! first/last/empty flags, items per page and the declared size. Each
//! check is independent; a page can fail several at once and every
//! failure is reported. The checker itself never fails — request and
//! decode problems become issues too.

use std::collections::BTreeMap;

use conformance_client::RequestTransport;
use conformance_core::{Issue, Page, StandardVersion};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::rng_from_seed;

/// Checks pagination invariants for one collection endpoint.
pub struct PaginationChecker<'a> {
    transport: &'a dyn RequestTransport,
    version: StandardVersion,
    per_page: i64,
    page_loop_limit: usize,
    rng: SmallRng,
}

impl<'a> PaginationChecker<'a> {
    pub fn new(
        transport: &'a dyn RequestTransport,
        version: StandardVersion,
        per_page: i64,
        page_loop_limit: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            transport,
            version,
            per_page,
            page_loop_limit,
            rng: rng_from_seed(seed),
        }
    }

    /// Validate the pagination metadata of `base_url + endpoint`.
    pub async fn check(&mut self, base_url: &str, endpoint: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        // Request the first page.
        let first = match self.fetch_page(base_url, endpoint, 1, &mut issues).await {
            Some(page) => page,
            None => return issues,
        };

        let last_page_number = first.total_pages;
        issues.extend(self.check_page_details(&first, endpoint, 1, last_page_number));

        // Cap the sample at three pages total.
        let total_pages = first.total_pages.min(3);
        if total_pages <= 1 {
            return issues;
        }

        // With more than two pages, sample random middle pages first.
        if first.total_pages > 2 {
            for _ in 0..self.page_loop_limit {
                let page_number = self.rng.random_range(2..first.total_pages);
                let page = match self
                    .fetch_page(base_url, endpoint, page_number, &mut issues)
                    .await
                {
                    Some(page) => page,
                    None => return issues,
                };
                issues.extend(self.check_page_details(&page, endpoint, page_number, last_page_number));
            }
        }

        // Always finish on the last page.
        if let Some(last) = self
            .fetch_page(base_url, endpoint, last_page_number, &mut issues)
            .await
        {
            issues.extend(self.check_page_details(&last, endpoint, last_page_number, last_page_number));
        }

        issues
    }

    async fn fetch_page(
        &self,
        base_url: &str,
        endpoint: &str,
        page_number: i64,
        issues: &mut Vec<Issue>,
    ) -> Option<Page> {
        let parameters = self.parameters(page_number);
        let url = format!(
            "{base_url}{endpoint}?per_page={}&page={page_number}",
            self.per_page
        );

        let document = match self.transport.get(&url).await {
            Ok(document) => document,
            Err(err) => {
                issues.push(
                    Issue::new("API response", err.to_string())
                        .with_description(format!(
                            "An error occurred when making a request to the `{endpoint}` endpoint"
                        ))
                        .with_parameters(parameters)
                        .with_endpoint(url),
                );
                return None;
            }
        };

        match Page::decode(self.version, &document) {
            Ok(page) => Some(page),
            Err(err) => {
                issues.push(
                    Issue::new("Page format", err.to_string())
                        .with_description(format!(
                            "The `{endpoint}` endpoint did not return a recognizable page document"
                        ))
                        .with_parameters(parameters)
                        .with_endpoint(url),
                );
                None
            }
        }
    }

    /// Run all five page-detail checks on one fetched page. Failures
    /// on one page do not block checks on another.
    fn check_page_details(
        &self,
        page: &Page,
        endpoint: &str,
        page_number: i64,
        total_pages: i64,
    ) -> Vec<Issue> {
        let parameters = self.parameters(page_number);
        [
            check_first_page_flag(page.first_page, page_number),
            check_last_page_flag(page.last_page, page_number, total_pages),
            check_empty_flag(page.empty, page.item_count()),
            check_items_per_page(page.item_count(), page.last_page, self.per_page),
            check_size(page.size, page.item_count()),
        ]
        .into_iter()
        .flatten()
        .map(|issue| {
            issue
                .with_parameters(parameters.clone())
                .with_endpoint(endpoint)
        })
        .collect()
    }

    fn parameters(&self, page_number: i64) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("per_page".to_string(), self.per_page.to_string()),
            ("page".to_string(), page_number.to_string()),
        ])
    }
}

/// The `first_page` flag must be set iff this is page 1.
fn check_first_page_flag(first_page_flag: bool, page_number: i64) -> Option<Issue> {
    if first_page_flag == (page_number == 1) {
        return None;
    }
    Some(
        Issue::new(
            "First page flag",
            format!(
                "The value of 'first_page' is {first_page_flag} when the page number is {page_number}"
            ),
        )
        .with_description("Is the 'first_page' flag returned correctly"),
    )
}

/// The `last_page` flag must be set iff this is the final page.
fn check_last_page_flag(last_page_flag: bool, page_number: i64, total_pages: i64) -> Option<Issue> {
    if last_page_flag == (page_number == total_pages) {
        return None;
    }
    Some(
        Issue::new(
            "Last page flag",
            format!(
                "The value of 'last_page' is {last_page_flag} when the page number is {page_number} of {total_pages}"
            ),
        )
        .with_description("Is the 'last_page' flag returned correctly"),
    )
}

/// The `empty` flag must agree with the returned item count.
fn check_empty_flag(empty_flag: bool, item_count: usize) -> Option<Issue> {
    if empty_flag == (item_count == 0) {
        return None;
    }
    Some(
        Issue::new(
            "Empty flag",
            format!("The value of 'empty' is {empty_flag} when {item_count} were returned in the response"),
        )
        .with_description("Is the 'empty' flag returned correctly"),
    )
}

/// Every page must return the requested number of items, except the
/// last page, which may be smaller.
fn check_items_per_page(item_count: usize, last_page_flag: bool, per_page: i64) -> Option<Issue> {
    if item_count as i64 == per_page || ((item_count as i64) < per_page && last_page_flag) {
        return None;
    }
    Some(
        Issue::new(
            "Items per page",
            format!(
                "The number of items returned is {item_count} when {per_page} item(s) were requested in the 'per_page' parameter"
            ),
        )
        .with_description("Is the number of items returned per page correct"),
    )
}

/// The declared `size` must equal the actual number of returned items.
fn check_size(size: i64, item_count: usize) -> Option<Issue> {
    if size == item_count as i64 {
        return None;
    }
    Some(
        Issue::new(
            "Item count",
            format!(
                "The value of 'size' is {size} when {item_count} item(s) were returned in the response content"
            ),
        )
        .with_description("Does the number of items returned match the 'size' value in the response"),
    )
}
