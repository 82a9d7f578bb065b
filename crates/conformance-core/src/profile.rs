//! Declarative test profile model.
//!
//! A profile is a named, versioned description of what "conformant"
//! means for one standard version: an ordered list of test groups,
//! each an ordered list of endpoint-level test cases. Profiles are
//! loaded once per validation run and are immutable thereafter.

use serde::{Deserialize, Serialize};

/// Severity attached to a test group's failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Error,
    Warning,
}

/// A named conformance profile with its ordered test groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestProfile {
    /// Profile name, matching the version token it covers.
    pub profile: String,
    /// Ordered test groups.
    pub test_groups: Vec<TestGroupDefinition>,
}

/// A named collection of test cases sharing a severity and a
/// `required` flag. Failure in a required group fails the whole
/// service; failure in a non-required group only warns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGroupDefinition {
    pub name: String,
    pub description: String,
    pub message_level: MessageLevel,
    #[serde(default)]
    pub required: bool,
    pub tests: Vec<TestCaseDefinition>,
}

/// One endpoint-level check: fetch, validate schema, optionally check
/// pagination, optionally chain an identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDefinition {
    pub name: String,
    pub description: String,
    /// Relative endpoint path, e.g. `/services`.
    pub endpoint: String,
    /// Schema file reference resolved through the schema store.
    pub schema: String,
    /// Run pagination invariant checks against this endpoint.
    #[serde(default)]
    pub pagination: bool,
    /// Publish an identifier observed in the response for later reuse.
    #[serde(default)]
    pub save_ids: bool,
    /// Response field holding the item collection the published
    /// identifier is read from.
    #[serde(default)]
    pub save_id_field: Option<String>,
    /// Consume an identifier previously published under this
    /// collection endpoint. The only cross-test-case coupling.
    #[serde(default)]
    pub use_id_from: Option<String>,
}

impl TestProfile {
    /// Total number of test cases across all groups.
    pub fn test_count(&self) -> usize {
        self.test_groups.iter().map(|g| g.tests.len()).sum()
    }
}
