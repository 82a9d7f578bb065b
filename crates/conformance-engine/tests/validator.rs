//! End-to-end validation runs against an in-memory service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use conformance_client::{MemoryTransport, RequestTransport, TransportError, TransportResult};
use conformance_core::TestProfile;
use conformance_engine::{CancelToken, ConformanceValidator, EngineError, ValidatorConfig};
use conformance_profiles::{MemoryProfileStore, MemorySchemaStore};
use pretty_assertions::assert_eq;
use serde_json::json;

const URL: &str = "https://api.example.org";

fn v3_profile() -> TestProfile {
    serde_json::from_value(json!({
        "profile": "HSDS-UK-3.0",
        "testGroups": [
            {
                "name": "API meta info",
                "description": "Basic API details",
                "messageLevel": "error",
                "required": true,
                "tests": [
                    {
                        "name": "API details",
                        "description": "Does the API root describe itself",
                        "endpoint": "/",
                        "schema": "api_details.json"
                    },
                    {
                        "name": "Service list",
                        "description": "Does the service list paginate",
                        "endpoint": "/services",
                        "schema": "service_list.json",
                        "saveIds": true,
                        "saveIdField": "contents"
                    },
                    {
                        "name": "Service by id",
                        "description": "Can a single service be fetched",
                        "endpoint": "/services/",
                        "schema": "service.json",
                        "useIdFrom": "/services"
                    }
                ]
            },
            {
                "name": "Taxonomies",
                "description": "Optional taxonomy endpoints",
                "messageLevel": "warning",
                "required": false,
                "tests": [
                    {
                        "name": "Taxonomy list",
                        "description": "Does the taxonomy list respond",
                        "endpoint": "/taxonomies",
                        "schema": "taxonomy_list.json"
                    }
                ]
            }
        ]
    }))
    .unwrap()
}

fn profiles() -> Arc<MemoryProfileStore> {
    let mut store = MemoryProfileStore::new();
    store.insert(v3_profile());
    Arc::new(store)
}

fn permissive_schemas() -> Arc<MemorySchemaStore> {
    let mut store = MemorySchemaStore::new();
    for reference in [
        "api_details.json",
        "service_list.json",
        "service.json",
        "taxonomy_list.json",
    ] {
        store.insert(reference, json!({"type": "object"}));
    }
    Arc::new(store)
}

fn conformant_service() -> MemoryTransport {
    let mut transport = MemoryTransport::new();
    transport.insert(format!("{URL}/"), json!({"version": "HSDS-UK-3.0"}));
    transport.insert(URL, json!({"version": "HSDS-UK-3.0"}));
    transport.insert(
        format!("{URL}/services"),
        json!({"contents": [{"id": "svc-1"}, {"id": "svc-2"}]}),
    );
    // Single-page shape for lazy identifier sampling: whether the
    // chained case finds a published id or samples on demand, it
    // resolves svc-1.
    transport.insert(
        format!("{URL}/services?page=1"),
        json!({
            "total_items": 2,
            "total_pages": 1,
            "page_number": 1,
            "size": 2,
            "first_page": true,
            "last_page": true,
            "empty": false,
            "contents": [{"id": "svc-1"}, {"id": "svc-2"}]
        }),
    );
    transport.insert(format!("{URL}/services/svc-1"), json!({"id": "svc-1"}));
    transport.insert(format!("{URL}/taxonomies"), json!({"contents": []}));
    transport
}

fn validator(transport: MemoryTransport) -> ConformanceValidator {
    ConformanceValidator::with_config(
        Arc::new(transport),
        profiles(),
        permissive_schemas(),
        ValidatorConfig {
            seed: Some(11),
            ..ValidatorConfig::default()
        },
    )
}

#[tokio::test]
async fn test_conformant_service_is_valid() {
    let report = validator(conformant_service())
        .validate(URL, None)
        .await
        .unwrap();

    assert!(report.service.is_valid);
    assert_eq!(report.service.url, URL);
    assert_eq!(report.service.profile, "HSDS-UK-3.0");
    assert_eq!(
        report.service.profile_reason,
        "Standard version HSDS-UK-3.0 read from '/' endpoint"
    );
    assert_eq!(report.test_count(), 4);
    for suite in &report.test_suites {
        assert!(suite.success, "suite {} failed", suite.name);
    }
}

#[tokio::test]
async fn test_report_preserves_declared_order() {
    let report = validator(conformant_service())
        .validate(URL, None)
        .await
        .unwrap();

    let suite_names: Vec<_> = report.test_suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(suite_names, vec!["API meta info", "Taxonomies"]);

    let case_names: Vec<_> = report.test_suites[0]
        .tests
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(case_names, vec!["API details", "Service list", "Service by id"]);
}

#[tokio::test]
async fn test_required_group_failure_invalidates_the_service() {
    let mut transport = conformant_service();
    transport.insert_failure(
        format!("{URL}/services"),
        TransportError::status(503, "Service Unavailable"),
    );

    let report = validator(transport).validate(URL, None).await.unwrap();

    assert!(!report.service.is_valid);
    let suite = &report.test_suites[0];
    assert!(!suite.success);
    // Every case still produced a result.
    assert_eq!(report.test_count(), 4);
}

#[tokio::test]
async fn test_non_required_group_failure_still_valid() {
    let mut transport = conformant_service();
    transport.insert_failure(
        format!("{URL}/taxonomies"),
        TransportError::status(500, "Internal Server Error"),
    );

    let report = validator(transport).validate(URL, None).await.unwrap();

    assert!(report.service.is_valid);
    assert!(!report.test_suites[1].success);
}

#[tokio::test]
async fn test_one_failing_case_does_not_disturb_its_neighbours() {
    let mut transport = conformant_service();
    transport.insert_failure(
        format!("{URL}/services"),
        TransportError::network("connection reset"),
    );

    let report = validator(transport).validate(URL, None).await.unwrap();

    let suite = &report.test_suites[0];
    assert!(suite.tests[0].success, "API details should still pass");
    assert!(!suite.tests[1].success);
    // The chained case falls back to sampling, which also fails, so it
    // reports the identifier problem rather than vanishing.
    assert!(!suite.tests[2].success);
    assert_eq!(
        suite.tests[2].messages[0].message,
        "Could not get a valid `id` for the request"
    );
}

#[tokio::test]
async fn test_identifier_chains_from_published_ids() {
    let report = validator(conformant_service())
        .validate(URL, None)
        .await
        .unwrap();

    let chained = &report.test_suites[0].tests[2];
    assert!(chained.success);
    assert_eq!(chained.id.as_deref(), Some("svc-1"));
    assert_eq!(chained.endpoint, format!("{URL}/services/"));
}

#[tokio::test]
async fn test_schema_violations_reported_per_case() {
    let mut schemas = MemorySchemaStore::new();
    schemas.insert(
        "api_details.json",
        json!({"type": "object", "required": ["version", "name"]}),
    );
    for reference in ["service_list.json", "service.json", "taxonomy_list.json"] {
        schemas.insert(reference, json!({"type": "object"}));
    }

    let validator = ConformanceValidator::with_config(
        Arc::new(conformant_service()),
        profiles(),
        Arc::new(schemas),
        ValidatorConfig {
            seed: Some(11),
            ..ValidatorConfig::default()
        },
    );

    let report = validator.validate(URL, None).await.unwrap();

    assert!(!report.service.is_valid);
    let details = &report.test_suites[0].tests[0];
    assert!(!details.success);
    assert!(details.messages.iter().all(|i| i.name == "required"));
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let report = validator(conformant_service())
        .validate(&format!("{URL}/"), None)
        .await
        .unwrap();
    assert_eq!(report.service.url, URL);
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let result = validator(conformant_service())
        .validate("ftp://api.example.org", None)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidUrl { .. })));

    let result = validator(conformant_service()).validate("nonsense", None).await;
    assert!(matches!(result, Err(EngineError::InvalidUrl { .. })));
}

#[tokio::test]
async fn test_missing_profile_is_a_load_error() {
    let result = validator(conformant_service())
        .validate(URL, Some("HSDS-UK-2.0"))
        .await;
    assert!(matches!(result, Err(EngineError::ProfileLoad { .. })));
}

#[tokio::test]
async fn test_explicit_profile_overrides_service_version() {
    let mut profiles = MemoryProfileStore::new();
    let mut v1 = v3_profile();
    v1.profile = "HSDS-UK-1.0".to_string();
    profiles.insert(v1);

    let validator = ConformanceValidator::with_config(
        Arc::new(conformant_service()),
        Arc::new(profiles),
        permissive_schemas(),
        ValidatorConfig {
            seed: Some(11),
            ..ValidatorConfig::default()
        },
    );

    let report = validator.validate(URL, Some("HSDS-UK-1.0")).await.unwrap();
    assert_eq!(report.service.profile, "HSDS-UK-1.0");
    assert_eq!(
        report.service.profile_reason,
        "Standard version HSDS-UK-1.0 read from profile parameter"
    );
}

#[tokio::test]
async fn test_cancelled_run_returns_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = validator(conformant_service())
        .validate_with_cancel(URL, None, cancel)
        .await;
    assert!(matches!(result, Err(EngineError::Cancelled)));
}

/// Transport that fires a cancellation token while serving one
/// specific URL and counts every request arriving after the token
/// fired.
struct TripwireTransport {
    inner: MemoryTransport,
    cancel: CancelToken,
    trigger: String,
    after_cancel: AtomicUsize,
}

#[async_trait]
impl RequestTransport for TripwireTransport {
    async fn get(&self, url: &str) -> TransportResult<serde_json::Value> {
        if self.cancel.is_cancelled() {
            self.after_cancel.fetch_add(1, Ordering::SeqCst);
        }
        if url == self.trigger {
            self.cancel.cancel();
        }
        self.inner.get(url).await
    }
}

#[tokio::test]
async fn test_cancellation_stops_requests_already_in_flight() {
    // A paginating profile would normally fetch several pages after
    // the list response.
    let profile: TestProfile = serde_json::from_value(json!({
        "profile": "HSDS-UK-3.0",
        "testGroups": [{
            "name": "Core endpoints",
            "description": "Services can be listed and paginated",
            "messageLevel": "error",
            "required": true,
            "tests": [{
                "name": "Service list",
                "description": "The service list paginates",
                "endpoint": "/services",
                "schema": "service_list.json",
                "pagination": true
            }]
        }]
    }))
    .unwrap();
    let mut profiles = MemoryProfileStore::new();
    profiles.insert(profile);

    let mut inner = MemoryTransport::new();
    inner.insert(format!("{URL}/"), json!({"version": "HSDS-UK-3.0"}));
    inner.insert(
        format!("{URL}/services"),
        json!({
            "total_items": 20,
            "total_pages": 4,
            "page_number": 1,
            "size": 5,
            "first_page": true,
            "last_page": false,
            "empty": false,
            "contents": [{"id": "svc-1"}]
        }),
    );

    let cancel = CancelToken::new();
    let transport = TripwireTransport {
        inner,
        cancel: cancel.clone(),
        // The run is cancelled while the case's own list fetch is
        // being served; all page fetches come after it.
        trigger: format!("{URL}/services"),
        after_cancel: AtomicUsize::new(0),
    };
    let transport = Arc::new(transport);

    let validator = ConformanceValidator::with_config(
        transport.clone(),
        Arc::new(profiles),
        permissive_schemas(),
        ValidatorConfig {
            seed: Some(11),
            ..ValidatorConfig::default()
        },
    );

    let result = validator
        .validate_with_cancel(URL, None, cancel.clone())
        .await;

    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert_eq!(
        transport.after_cancel.load(Ordering::SeqCst),
        0,
        "requests issued after cancellation"
    );
}
