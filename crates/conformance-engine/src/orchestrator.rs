//! Run orchestration.
//!
//! [`ConformanceValidator`] is the engine's entry point. It normalizes
//! and vets the service URL, selects the profile, then fans every test
//! case of every group out onto its own task and joins them back in
//! declared order, so the report layout is deterministic regardless of
//! completion timing. A panicking case is absorbed into a failing
//! result; only URL and profile problems abort a run.

use std::sync::Arc;

use conformance_client::RequestTransport;
use conformance_core::{
    Issue, ServiceDetails, StandardVersion, TestCaseDefinition, TestGroupDefinition,
    TestGroupResult, TestResult, ValidationReport,
};
use conformance_profiles::{ProfileStore, SchemaStore};
use futures::future::join_all;
use tracing::{info, instrument};
use url::Url;

use crate::cancel::{CancelGuard, CancelToken};
use crate::error::{EngineError, EngineResult};
use crate::executor::{critical_failure, RunContext, TestCaseExecutor};
use crate::selector::ProfileSelector;
use crate::ValidatorConfig;

/// Validates a remote service against the standard.
#[derive(Clone)]
pub struct ConformanceValidator {
    transport: Arc<dyn RequestTransport>,
    profiles: Arc<dyn ProfileStore>,
    schemas: Arc<dyn SchemaStore>,
    config: ValidatorConfig,
}

impl ConformanceValidator {
    pub fn new(
        transport: Arc<dyn RequestTransport>,
        profiles: Arc<dyn ProfileStore>,
        schemas: Arc<dyn SchemaStore>,
    ) -> Self {
        Self::with_config(transport, profiles, schemas, ValidatorConfig::default())
    }

    pub fn with_config(
        transport: Arc<dyn RequestTransport>,
        profiles: Arc<dyn ProfileStore>,
        schemas: Arc<dyn SchemaStore>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            transport,
            profiles,
            schemas,
            config,
        }
    }

    /// Validate `service_url`, optionally forcing a profile.
    pub async fn validate(
        &self,
        service_url: &str,
        explicit_profile: Option<&str>,
    ) -> EngineResult<ValidationReport> {
        self.validate_with_cancel(service_url, explicit_profile, CancelToken::new())
            .await
    }

    /// Validate with an externally held cancellation token. The token
    /// is polled between units of work; once it fires the run finishes
    /// the in-flight cases and returns [`EngineError::Cancelled`].
    #[instrument(skip(self, cancel), fields(url = service_url))]
    pub async fn validate_with_cancel(
        &self,
        service_url: &str,
        explicit_profile: Option<&str>,
        cancel: CancelToken,
    ) -> EngineResult<ValidationReport> {
        let service_url = normalize_url(service_url)?;

        let guard = CancelGuard::new(self.transport.as_ref(), cancel.clone());
        let selection = ProfileSelector::new(&guard)
            .select(&service_url, explicit_profile)
            .await;
        info!(
            version = %selection.version,
            reason = %selection.reason,
            "profile selected"
        );

        let profile = self
            .profiles
            .load_profile(selection.version.as_str())
            .await
            .map_err(|source| EngineError::profile_load(selection.version.as_str(), source))?;

        let context = Arc::new(RunContext::new());
        let group_tasks: Vec<_> = profile
            .test_groups
            .iter()
            .map(|group| {
                self.spawn_group(
                    group.clone(),
                    selection.version,
                    service_url.clone(),
                    context.clone(),
                    &cancel,
                )
            })
            .collect();

        let mut test_suites = Vec::with_capacity(group_tasks.len());
        for (handle, group) in group_tasks.into_iter().zip(&profile.test_groups) {
            let tests = match handle.await {
                Ok(tests) => tests,
                // A panic in a group task fails every case in it.
                Err(join_err) => group
                    .tests
                    .iter()
                    .map(|case| panicked_result(case, &service_url, &join_err))
                    .collect(),
            };
            test_suites.push(TestGroupResult::from_definition(group, tests));
        }

        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let is_valid = ValidationReport::compute_validity(&test_suites);
        info!(is_valid, suites = test_suites.len(), "validation run complete");

        Ok(ValidationReport {
            service: ServiceDetails {
                url: service_url,
                is_valid,
                profile: selection.version.as_str().to_string(),
                profile_reason: selection.reason,
            },
            test_suites,
        })
    }

    /// One task per group; inside it, one task per case, joined in
    /// declared order.
    fn spawn_group(
        &self,
        group: TestGroupDefinition,
        version: StandardVersion,
        service_url: String,
        context: Arc<RunContext>,
        cancel: &CancelToken,
    ) -> tokio::task::JoinHandle<Vec<TestResult>> {
        let transport = self.transport.clone();
        let schemas = self.schemas.clone();
        let config = self.config.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
            let case_tasks: Vec<_> = group
                .tests
                .iter()
                .cloned()
                .map(|case| {
                    let transport = transport.clone();
                    let schemas = schemas.clone();
                    let config = config.clone();
                    let context = context.clone();
                    let cancel = cancel.clone();
                    let service_url = service_url.clone();

                    tokio::spawn(async move {
                        if cancel.is_cancelled() {
                            return cancelled_result(&case, &service_url);
                        }
                        // Every GET the case makes goes through the
                        // guard, so cancellation stops pagination and
                        // sampling fetches mid-case too.
                        let guard = CancelGuard::new(transport.as_ref(), cancel.clone());
                        let executor = TestCaseExecutor::new(
                            &guard,
                            schemas.as_ref(),
                            version,
                            &config,
                        );
                        executor.execute(&case, &service_url, &context).await
                    })
                })
                .collect();

            join_all(case_tasks)
                .await
                .into_iter()
                .zip(&group.tests)
                .map(|(joined, case)| match joined {
                    Ok(result) => result,
                    Err(join_err) => panicked_result(case, &service_url, &join_err),
                })
                .collect()
        })
    }
}

fn normalize_url(raw: &str) -> EngineResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|_| EngineError::invalid_url(raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EngineError::invalid_url(raw));
    }
    Ok(trimmed.to_string())
}

fn panicked_result(
    case: &TestCaseDefinition,
    service_url: &str,
    join_err: &tokio::task::JoinError,
) -> TestResult {
    let endpoint = format!("{service_url}{}", case.endpoint);
    TestResult::failure(
        case,
        endpoint.clone(),
        critical_failure(join_err.to_string(), &endpoint),
    )
}

fn cancelled_result(case: &TestCaseDefinition, service_url: &str) -> TestResult {
    let endpoint = format!("{service_url}{}", case.endpoint);
    TestResult::failure(
        case,
        endpoint.clone(),
        Issue::new("Run cancelled", "The validation run was cancelled")
            .with_endpoint(endpoint),
    )
}
