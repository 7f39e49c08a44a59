use std::collections::HashMap;

use async_trait::async_trait;
use msme_core::store::Filter;
use msme_core::{DocumentStore, Result};
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory document store. The default backend; also what the tests
/// run against. Insertion order is preserved per collection so that
/// listings are deterministic.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, collection: &str, key: &str, document: Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if let Some((_, existing)) = docs.iter_mut().find(|(k, _)| k == key) {
            *existing = document;
        } else {
            docs.push((key.to_string(), document));
        }
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| filter.matches(doc))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list(&self, collection: &str, filter: &Filter, limit: usize) -> Result<Vec<Value>> {
        let mut matches = self.find(collection, filter).await?;
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(|d| d.len() as u64).unwrap_or(0))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_is_idempotent_on_key() {
        let store = MemoryStore::new();
        store
            .upsert("companies", "acme", json!({"name": "Acme", "sector": "Textiles"}))
            .await
            .unwrap();
        store
            .upsert("companies", "acme", json!({"name": "Acme", "sector": "Healthcare"}))
            .await
            .unwrap();

        assert_eq!(store.count("companies").await.unwrap(), 1);
        let docs = store.find("companies", &Filter::new()).await.unwrap();
        assert_eq!(docs[0]["sector"], "Healthcare");
    }

    #[tokio::test]
    async fn find_on_missing_collection_returns_empty() {
        let store = MemoryStore::new();
        let docs = store.find("nowhere", &Filter::new()).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn list_honors_filter_and_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .upsert(
                    "companies",
                    &format!("c{}", i),
                    json!({"name": format!("Company {}", i), "sector": "Healthcare"}),
                )
                .await
                .unwrap();
        }
        store
            .upsert("companies", "tex", json!({"name": "Tex", "sector": "Textiles"}))
            .await
            .unwrap();

        let filter = Filter::new().contains("sector", "health");
        let docs = store.list("companies", &filter, 3).await.unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d["sector"] == "Healthcare"));
    }
}
