//! Document storage abstraction for yearbook records.
//!
//! This module keeps persistence separate from tenant and business rules.
//! The `StorageProvider` trait only knows about collections of JSON documents
//! keyed by id; everything about departments, tenant encodings and ownership
//! lives in the layers above it.
//!
//! # Architecture
//!
//! The storage layer is responsible for:
//! - PUT/GET/DELETE of JSON documents
//! - Exact-match querying with simple filters
//! - Counting and enumerating collections
//!
//! The storage layer is NOT responsible for:
//! - Timestamps, id generation or validation
//! - Tenant resolution (see [`crate::tenant`])
//! - Uniqueness rules (slug, code, reference number)
//!
//! At the storage level CREATE and UPDATE are the same operation: a document is
//! put at a key. Whether that is a create or an update is decided by callers.
//!
//! # Example Usage
//!
//! ```rust
//! use yearbook_server::storage::{Filter, InMemoryStorage, StorageKey, StorageProvider};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let key = StorageKey::new("students", "64b7f0c2a1b2c3d4e5f60718");
//! storage
//!     .put(key.clone(), json!({"referenceNumber": "REF-1", "workspace": "cs"}))
//!     .await?;
//!
//! let found = storage
//!     .find(StorageKey::collection("students"), &Filter::new().eq("workspace", "cs"))
//!     .await?;
//! assert_eq!(found.len(), 1);
//!
//! assert!(storage.delete(key).await?);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::{InMemoryStorage, InMemoryStorageStats};

use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Key of a single document: `collection` → `document_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    collection: String,
    document_id: String,
}

impl StorageKey {
    /// Create a new storage key.
    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// Get the collection name.
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Get the document id.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Reference a whole collection for listing and querying.
    pub fn collection(name: impl Into<String>) -> CollectionRef {
        CollectionRef { name: name.into() }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document_id)
    }
}

/// A named collection of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    name: String,
}

impl CollectionRef {
    /// Get the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single match condition on a dot-separated attribute path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The attribute equals the value exactly (JSON equality).
    Equals(String, Value),
    /// The attribute equals one of the values.
    OneOf(String, Vec<Value>),
}

impl Condition {
    /// Attribute path this condition inspects.
    pub fn path(&self) -> &str {
        match self {
            Condition::Equals(path, _) | Condition::OneOf(path, _) => path,
        }
    }

    /// Whether an extracted attribute value satisfies the condition.
    ///
    /// A missing attribute never matches.
    pub fn matches(&self, candidate: Option<&Value>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        match self {
            Condition::Equals(_, expected) => candidate == expected,
            Condition::OneOf(_, options) => options.iter().any(|option| option == candidate),
        }
    }
}

/// Conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `path` to equal `value`.
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Equals(path.into(), value.into()));
        self
    }

    /// Require `path` to equal one of `values`.
    pub fn one_of(mut self, path: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push(Condition::OneOf(path.into(), values));
        self
    }

    /// Append every condition of `other`.
    pub fn and(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    /// The conditions of this filter.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches(extract_attribute(document, condition.path())))
    }
}

/// Walk a dot-separated path into a JSON document.
///
/// Numeric segments index into arrays.
pub fn extract_attribute<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(index) if current.is_array() => current.get(index)?,
            _ => current.get(part)?,
        };
    }
    Some(current)
}

/// Core trait for document storage backends.
///
/// Implementations persist JSON documents grouped in named collections. They
/// know nothing about yearbook semantics.
///
/// # Design Principles
///
/// - **PUT/GET/DELETE Model**: create and update are both `put`
/// - **PUT Returns Data**: callers get back exactly what a `get` would return
/// - **DELETE Returns Boolean**: whether the document existed
/// - **Exact Matching**: `find` and `count` compare JSON values for equality,
///   so a text value never matches a reference object with the same hex
/// - **Async First**: every operation returns a future
pub trait StorageProvider: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a document at the key, replacing any previous document.
    fn put(
        &self,
        key: StorageKey,
        data: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;

    /// Retrieve a document by key.
    fn get(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Delete a document. Returns `true` if it existed.
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// List documents of a collection ordered by document id.
    ///
    /// An `offset` past the end or a `limit` of 0 yields an empty vector.
    fn list(
        &self,
        collection: CollectionRef,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Find every document of a collection matching the filter, ordered by
    /// document id.
    fn find(
        &self,
        collection: CollectionRef,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Count documents of a collection matching the filter.
    fn count(
        &self,
        collection: CollectionRef,
        filter: &Filter,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    /// Check whether a document exists.
    fn exists(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Names of every collection holding at least one document.
    fn list_collections(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    /// Remove every document from every collection.
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
