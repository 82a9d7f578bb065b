//! Hierarchical validation report.
//!
//! A completed run produces one [`ValidationReport`]: service-level
//! details plus one [`TestGroupResult`] per profile group, each owning
//! its [`TestResult`]s. Overall validity is the AND of `success` over
//! required groups only; non-required groups can fail without
//! invalidating the service.

use serde::{Deserialize, Serialize};

use crate::issue::Issue;
use crate::profile::{MessageLevel, TestCaseDefinition, TestGroupDefinition};

/// Report for one validation run against one service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub service: ServiceDetails,
    pub test_suites: Vec<TestGroupResult>,
}

/// Service-level summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    /// Normalized service URL.
    pub url: String,
    /// AND of `success` over required groups.
    pub is_valid: bool,
    /// Selected profile name.
    pub profile: String,
    /// Human-auditable reason for the profile selection.
    pub profile_reason: String,
}

/// Result of one test group, mirroring its definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGroupResult {
    pub name: String,
    pub description: String,
    pub message_level: MessageLevel,
    pub required: bool,
    pub success: bool,
    pub tests: Vec<TestResult>,
}

/// Result of one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub endpoint: String,
    /// Resolved identifier when identifier chaining occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Full sampled identifier set when identifier chaining occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    pub description: String,
    pub success: bool,
    pub messages: Vec<Issue>,
}

impl TestResult {
    /// Start a result for a test case; success until issues arrive.
    pub fn new(case: &TestCaseDefinition, endpoint: impl Into<String>) -> Self {
        Self {
            name: case.name.clone(),
            endpoint: endpoint.into(),
            id: None,
            ids: None,
            description: case.description.clone(),
            success: true,
            messages: Vec::new(),
        }
    }

    /// A result that failed before or during its request, carrying a
    /// single issue.
    pub fn failure(case: &TestCaseDefinition, endpoint: impl Into<String>, issue: Issue) -> Self {
        Self {
            name: case.name.clone(),
            endpoint: endpoint.into(),
            id: None,
            ids: None,
            description: case.description.clone(),
            success: false,
            messages: vec![issue],
        }
    }

    /// Append issues and recompute `success`.
    pub fn add_issues(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.messages.extend(issues);
        self.success = self.messages.is_empty();
    }
}

impl TestGroupResult {
    /// Assemble a group result from its definition and the results of
    /// its cases, computing `success` as the AND over all cases.
    pub fn from_definition(definition: &TestGroupDefinition, tests: Vec<TestResult>) -> Self {
        let success = tests.iter().all(|t| t.success);
        Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            message_level: definition.message_level,
            required: definition.required,
            success,
            tests,
        }
    }
}

impl ValidationReport {
    /// Overall validity per the aggregation invariant: required
    /// groups only.
    pub fn compute_validity(test_suites: &[TestGroupResult]) -> bool {
        test_suites.iter().filter(|g| g.required).all(|g| g.success)
    }

    /// Total number of test results across all groups.
    pub fn test_count(&self) -> usize {
        self.test_suites.iter().map(|g| g.tests.len()).sum()
    }
}
