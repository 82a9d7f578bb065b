//! In-memory stores for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use conformance_core::TestProfile;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::store::{ProfileStore, SchemaStore};

/// Profile store answering from a fixed name-to-profile map.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: HashMap<String, TestProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: TestProfile) -> &mut Self {
        self.profiles.insert(profile.profile.clone(), profile);
        self
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load_profile(&self, name: &str) -> StoreResult<TestProfile> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }
}

/// Schema store answering from a fixed reference-to-document map.
#[derive(Debug, Default)]
pub struct MemorySchemaStore {
    schemas: HashMap<String, Value>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, schema: Value) -> &mut Self {
        self.schemas.insert(reference.into(), schema);
        self
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn load_schema(&self, reference: &str) -> StoreResult<Value> {
        self.schemas
            .get(reference)
            .cloned()
            .ok_or_else(|| StoreError::not_found(reference))
    }
}
