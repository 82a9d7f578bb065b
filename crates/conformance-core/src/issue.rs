//! A single reported nonconformance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One nonconformance found while validating a service: a schema
/// violation, a pagination inconsistency, or a request failure.
/// Issues carry human-readable context only, never exception
/// internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Short name of the failed check.
    pub name: String,
    /// What the check verifies.
    #[serde(default)]
    pub description: String,
    /// What went wrong, with expected/actual values.
    #[serde(default)]
    pub message: String,
    /// Path of the failing location inside the document.
    #[serde(default)]
    pub error_in: String,
    /// Path of the violated rule inside the schema.
    #[serde(default)]
    pub error_at: String,
    /// Request parameters in effect when the issue was observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
    /// Endpoint URL the issue was observed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Issue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            message: message.into(),
            error_in: String::new(),
            error_at: String::new(),
            parameters: None,
            endpoint: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(
        mut self,
        error_in: impl Into<String>,
        error_at: impl Into<String>,
    ) -> Self {
        self.error_in = error_in.into();
        self.error_at = error_at.into();
        self
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
