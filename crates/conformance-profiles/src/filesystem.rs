//! Filesystem-backed profile and schema stores.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use conformance_core::TestProfile;
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{ProfileStore, SchemaStore};

async fn read_json(root: &Path, name: &str, file_name: &str) -> StoreResult<Value> {
    let path = root.join(file_name);
    if !path.exists() {
        return Err(StoreError::not_found(name));
    }

    debug!(name, path = %path.display(), "loading document");
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| StoreError::io(name, e))?;

    serde_json::from_str(&content).map_err(|e| StoreError::parse(name, e.to_string()))
}

/// Loads `<root>/<name>.json` test profiles.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    root: PathBuf,
}

impl FileProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load_profile(&self, name: &str) -> StoreResult<TestProfile> {
        let document = read_json(&self.root, name, &format!("{name}.json")).await?;
        serde_json::from_value(document).map_err(|e| StoreError::parse(name, e.to_string()))
    }
}

/// Loads JSON Schema documents relative to a schema directory.
#[derive(Debug, Clone)]
pub struct FileSchemaStore {
    root: PathBuf,
}

impl FileSchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SchemaStore for FileSchemaStore {
    async fn load_schema(&self, reference: &str) -> StoreResult<Value> {
        read_json(&self.root, reference, reference).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_fixture(dir: &Path, file_name: &str, content: &str) {
        std::fs::write(dir.join(file_name), content).unwrap();
    }

    #[tokio::test]
    async fn test_loads_profile_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            "HSDS-UK-3.0.json",
            r#"{"profile": "HSDS-UK-3.0", "testGroups": []}"#,
        );

        let store = FileProfileStore::new(dir.path());
        let profile = store.load_profile("HSDS-UK-3.0").await.unwrap();
        assert_eq!(profile.profile, "HSDS-UK-3.0");
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());
        let result = store.load_profile("HSDS-UK-2.0").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_malformed_profile_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "broken.json", "{not json");

        let store = FileProfileStore::new(dir.path());
        let result = store.load_profile("broken").await;
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_loads_schema_by_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "service.json", r#"{"type": "object"}"#);

        let store = FileSchemaStore::new(dir.path());
        let schema = store.load_schema("service.json").await.unwrap();
        assert_eq!(schema["type"], "object");
    }
}
