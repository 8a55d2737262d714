//! In-memory document storage.
//!
//! Thread-safe implementation of [`StorageProvider`] backed by nested
//! `HashMap`s behind a tokio `RwLock`. Used for tests, demos and any deployment
//! that does not need persistence.
//!
//! # Performance Characteristics
//!
//! * PUT/GET/DELETE/EXISTS: O(1) average case
//! * LIST/FIND/COUNT: O(n) in the size of the collection
//!
//! # Example Usage
//!
//! ```rust
//! use yearbook_server::storage::{InMemoryStorage, StorageKey, StorageProvider};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! let key = StorageKey::new("departments", "64b7f0c2a1b2c3d4e5f60718");
//! storage.put(key.clone(), json!({"slug": "cs-dept"})).await?;
//! assert!(storage.exists(key).await?);
//! # Ok(())
//! # }
//! ```

use crate::storage::{CollectionRef, Filter, StorageError, StorageKey, StorageProvider};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collections = HashMap<String, HashMap<String, Value>>;

/// Thread-safe in-memory storage.
///
/// Layout: `collection` → `document_id` → `document`.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<Collections>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStorageStats {
        let data_guard = self.data.read().await;
        let collection_count = data_guard.values().filter(|docs| !docs.is_empty()).count();
        let total_documents = data_guard.values().map(HashMap::len).sum();

        InMemoryStorageStats {
            collection_count,
            total_documents,
        }
    }

    fn sorted_matches(
        collection: &CollectionRef,
        documents: &HashMap<String, Value>,
        filter: &Filter,
    ) -> Vec<(StorageKey, Value)> {
        let mut results: Vec<(StorageKey, Value)> = documents
            .iter()
            .filter(|(_, document)| filter.matches(document))
            .map(|(id, document)| {
                (
                    StorageKey::new(collection.name(), id.as_str()),
                    document.clone(),
                )
            })
            .collect();
        results.sort_by(|a, b| a.0.document_id().cmp(b.0.document_id()));
        results
    }

    fn check_filter(filter: &Filter) -> Result<(), StorageError> {
        match filter
            .conditions()
            .iter()
            .find(|condition| condition.path().is_empty())
        {
            Some(condition) => Err(StorageError::invalid_query(
                "attribute path must not be empty",
                condition.path(),
            )),
            None => Ok(()),
        }
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn put(&self, key: StorageKey, data: Value) -> Result<Value, Self::Error> {
        if !data.is_object() {
            return Err(StorageError::invalid_data(format!(
                "document at {} must be a JSON object",
                key
            )));
        }

        let mut data_guard = self.data.write().await;
        data_guard
            .entry(key.collection_name().to_string())
            .or_default()
            .insert(key.document_id().to_string(), data.clone());

        Ok(data)
    }

    async fn get(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let data_guard = self.data.read().await;
        Ok(data_guard
            .get(key.collection_name())
            .and_then(|documents| documents.get(key.document_id()))
            .cloned())
    }

    async fn delete(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let mut data_guard = self.data.write().await;
        Ok(data_guard
            .get_mut(key.collection_name())
            .map(|documents| documents.remove(key.document_id()).is_some())
            .unwrap_or(false))
    }

    async fn list(
        &self,
        collection: CollectionRef,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let data_guard = self.data.read().await;
        let Some(documents) = data_guard.get(collection.name()) else {
            return Ok(Vec::new());
        };

        Ok(Self::sorted_matches(&collection, documents, &Filter::new())
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn find(
        &self,
        collection: CollectionRef,
        filter: &Filter,
    ) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        Self::check_filter(filter)?;

        let data_guard = self.data.read().await;
        Ok(data_guard
            .get(collection.name())
            .map(|documents| Self::sorted_matches(&collection, documents, filter))
            .unwrap_or_default())
    }

    async fn count(&self, collection: CollectionRef, filter: &Filter) -> Result<usize, Self::Error> {
        Self::check_filter(filter)?;

        let data_guard = self.data.read().await;
        Ok(data_guard
            .get(collection.name())
            .map(|documents| {
                documents
                    .values()
                    .filter(|document| filter.matches(document))
                    .count()
            })
            .unwrap_or(0))
    }

    async fn exists(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let data_guard = self.data.read().await;
        Ok(data_guard
            .get(key.collection_name())
            .is_some_and(|documents| documents.contains_key(key.document_id())))
    }

    async fn list_collections(&self) -> Result<Vec<String>, Self::Error> {
        let data_guard = self.data.read().await;
        let mut names: Vec<String> = data_guard
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.data.write().await.clear();
        Ok(())
    }
}

/// Statistics about the current state of in-memory storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStorageStats {
    /// Number of non-empty collections
    pub collection_count: usize,
    /// Total number of documents
    pub total_documents: usize,
}
