//! Test case execution.
//!
//! Runs one test case end to end: resolve a chained identifier if the
//! case needs one, fetch the endpoint, validate the response schema,
//! optionally check pagination, and fold every failure into the
//! returned [`TestResult`]. The executor never propagates an error —
//! a defect in one test case must never abort the encompassing run.

use std::collections::HashMap;

use conformance_client::RequestTransport;
use conformance_core::{Issue, Page, StandardVersion, TestCaseDefinition, TestResult};
use conformance_profiles::SchemaStore;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::pagination::PaginationChecker;
use crate::sampler::IdSampler;
use crate::schema_check::SchemaChecker;
use crate::ValidatorConfig;

/// Mutable state owned by a single validation run.
///
/// Holds the identifiers published by `saveIds` test cases for
/// consumption by `useIdFrom` cases. Created fresh per run and
/// discarded with it — never retained on a long-lived component, so
/// concurrent runs cannot observe each other's identifiers.
#[derive(Debug, Default)]
pub struct RunContext {
    saved_ids: RwLock<HashMap<String, String>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an identifier observed at `endpoint`.
    pub async fn save_id(&self, endpoint: &str, id: String) {
        self.saved_ids.write().await.insert(id_key(endpoint), id);
    }

    /// Identifier previously published for `endpoint`, if any.
    pub async fn saved_id(&self, endpoint: &str) -> Option<String> {
        self.saved_ids.read().await.get(&id_key(endpoint)).cloned()
    }
}

fn id_key(endpoint: &str) -> String {
    format!("{endpoint}-id")
}

/// Executes one test case against one service.
pub struct TestCaseExecutor<'a> {
    transport: &'a dyn RequestTransport,
    schemas: &'a dyn SchemaStore,
    version: StandardVersion,
    config: &'a ValidatorConfig,
}

impl<'a> TestCaseExecutor<'a> {
    pub fn new(
        transport: &'a dyn RequestTransport,
        schemas: &'a dyn SchemaStore,
        version: StandardVersion,
        config: &'a ValidatorConfig,
    ) -> Self {
        Self {
            transport,
            schemas,
            version,
            config,
        }
    }

    /// Run `case` against `service_url`. All failures are captured in
    /// the returned result.
    pub async fn execute(
        &self,
        case: &TestCaseDefinition,
        service_url: &str,
        context: &RunContext,
    ) -> TestResult {
        let endpoint_url = format!("{service_url}{}", case.endpoint);
        let mut result = TestResult::new(case, endpoint_url.clone());

        // Resolve a chained identifier before anything else.
        let request_url = if let Some(from) = &case.use_id_from {
            let id = match self.resolve_id(from, service_url, context, &mut result).await {
                Some(id) => id,
                None => {
                    return TestResult::failure(
                        case,
                        endpoint_url,
                        Issue::new("API issue", "Could not get a valid `id` for the request")
                            .with_description("Identifier resolution")
                            .with_endpoint(format!("{service_url}{from}")),
                    );
                }
            };
            result.id = Some(id.clone());
            format!("{endpoint_url}{id}")
        } else {
            endpoint_url.clone()
        };

        let response = match self.transport.get(&request_url).await {
            Ok(response) => response,
            Err(err) => {
                result.add_issues([Issue::new("API response issue", err.to_string())
                    .with_endpoint(request_url)]);
                return result;
            }
        };

        let schema = match self.schemas.load_schema(&case.schema).await {
            Ok(schema) => schema,
            Err(err) => {
                result.add_issues([critical_failure(err.to_string(), &request_url)]);
                return result;
            }
        };

        match SchemaChecker::validate(&response, &schema) {
            Ok(issues) => result.add_issues(issues),
            Err(err) => {
                result.add_issues([critical_failure(err.to_string(), &request_url)]);
                return result;
            }
        }

        if case.save_ids {
            self.publish_id(case, &response, context).await;
        }

        if case.pagination {
            let mut checker = PaginationChecker::new(
                self.transport,
                self.version,
                self.config.per_page,
                self.config.page_loop_limit,
                self.config.seed,
            );
            let issues = checker.check(service_url, &case.endpoint).await;
            result.add_issues(issues);
        }

        result
    }

    /// Lazy identifier resolution: a previously published id wins,
    /// otherwise the collection endpoint is sampled on demand.
    async fn resolve_id(
        &self,
        from: &str,
        service_url: &str,
        context: &RunContext,
        result: &mut TestResult,
    ) -> Option<String> {
        if let Some(id) = context.saved_id(from).await {
            debug!(endpoint = from, %id, "reusing published identifier");
            return Some(id);
        }

        let mut sampler = IdSampler::new(self.transport, self.version, self.config.seed);
        match sampler
            .sample_ids(service_url, from, self.config.sample_limit)
            .await
        {
            Ok(ids) if !ids.is_empty() => {
                let id = ids[0].clone();
                result.ids = Some(ids);
                Some(id)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(endpoint = from, %err, "identifier sampling failed");
                None
            }
        }
    }

    /// Publish the first item id of the saved field for later cases.
    async fn publish_id(&self, case: &TestCaseDefinition, response: &serde_json::Value, context: &RunContext) {
        let Some(field) = &case.save_id_field else {
            warn!(case = %case.name, "saveIds set without saveIdField");
            return;
        };

        let id = response
            .get(field)
            .and_then(|items| items.get(0))
            .and_then(Page::item_id);

        match id {
            Some(id) => context.save_id(&case.endpoint, id).await,
            None => debug!(case = %case.name, %field, "no identifier found to publish"),
        }
    }
}

/// Boundary adapter for unexpected failures: whatever went wrong
/// becomes one issue, and the run carries on.
pub(crate) fn critical_failure(message: impl Into<String>, endpoint: &str) -> Issue {
    Issue::new("Critical failure", message)
        .with_description("An unexpected error stopped this test case")
        .with_endpoint(endpoint)
}
