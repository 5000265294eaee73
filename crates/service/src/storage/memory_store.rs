use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::name::DocumentName;
use super::DocumentStore;
use crate::errors::StoreError;

/// Process-local store backed by a sorted map. Used by router tests and
/// anywhere persistence is not wanted.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn save(&self, name: &DocumentName, content: &Value) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.insert(name.as_str().to_string(), content.clone());
        Ok(())
    }

    async fn load(&self, name: &DocumentName) -> Result<Value, StoreError> {
        let map = self.inner.read().await;
        map.get(name.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(name.as_str()))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.keys().cloned().collect())
    }

    async fn exists(&self, name: &DocumentName) -> Result<bool, StoreError> {
        let map = self.inner.read().await;
        Ok(map.contains_key(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_behaves_like_a_flat_namespace() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        let a = DocumentName::parse("b.json")?;
        let b = DocumentName::parse("a.json")?;

        assert!(store.list().await?.is_empty());
        assert!(matches!(store.load(&a).await, Err(StoreError::NotFound(_))));

        store.save(&a, &json!({"v": 1})).await?;
        store.save(&b, &json!({"v": 2})).await?;
        store.save(&a, &json!({"v": 3})).await?;

        assert_eq!(store.load(&a).await?, json!({"v": 3}));
        assert!(store.exists(&b).await?);
        assert_eq!(store.list().await?, vec!["a.json", "b.json"]);
        Ok(())
    }
}
