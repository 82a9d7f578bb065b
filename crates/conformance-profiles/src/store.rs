//! Store traits the engine consumes.

use async_trait::async_trait;
use conformance_core::TestProfile;
use serde_json::Value;

use crate::error::StoreResult;

/// Load a named test profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, name: &str) -> StoreResult<TestProfile>;
}

/// Load a JSON Schema document by the reference a test case carries.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    async fn load_schema(&self, reference: &str) -> StoreResult<Value>;
}
