//! Typed repositories over the document store.
//!
//! [`Collection`] maps records to and from stored documents. Records owned
//! by a department go through [`ScopedRepository`], which runs every tenant
//! query through the [`TenantKeyResolver`].

mod admin;
mod department;
mod scoped;
mod student;
mod records;

pub use admin::AdminRepository;
pub use department::DepartmentRepository;
pub use records::{AlbumRepository, EventRepository, ImageRepository, ReportRepository};
pub use scoped::ScopedRepository;
pub use student::StudentRepository;

use crate::error::{YearbookError, YearbookResult};
use crate::models::{Document, decode_documents};
use crate::storage::{Filter, StorageKey, StorageProvider};
use crate::tenant::ObjectId;
use log::trace;
use std::marker::PhantomData;
use std::sync::Arc;

/// All records of one type.
pub struct Collection<S, D> {
    storage: Arc<S>,
    _record: PhantomData<fn() -> D>,
}

impl<S, D> Clone for Collection<S, D> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _record: PhantomData,
        }
    }
}

impl<S: StorageProvider, D: Document> Collection<S, D> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            _record: PhantomData,
        }
    }

    /// Store a new record.
    pub async fn insert(&self, record: &D) -> YearbookResult<D> {
        trace!("Inserting {} {}", D::RESOURCE_TYPE, record.id());
        self.put(record).await
    }

    /// Store an existing record, replacing the previous version.
    pub async fn save(&self, record: &D) -> YearbookResult<D> {
        trace!("Saving {} {}", D::RESOURCE_TYPE, record.id());
        self.put(record).await
    }

    pub async fn get(&self, id: ObjectId) -> YearbookResult<Option<D>> {
        let stored = self
            .storage
            .get(StorageKey::new(D::COLLECTION, id.to_hex()))
            .await
            .map_err(YearbookError::storage)?;

        Ok(stored.map(serde_json::from_value::<D>).transpose()?)
    }

    /// Delete by id. Returns `true` if the record existed.
    pub async fn delete(&self, id: ObjectId) -> YearbookResult<bool> {
        self.storage
            .delete(StorageKey::new(D::COLLECTION, id.to_hex()))
            .await
            .map_err(YearbookError::storage)
    }

    pub async fn all(&self) -> YearbookResult<Vec<D>> {
        self.find(&Filter::new()).await
    }

    pub async fn find(&self, filter: &Filter) -> YearbookResult<Vec<D>> {
        let found = self
            .storage
            .find(StorageKey::collection(D::COLLECTION), filter)
            .await
            .map_err(YearbookError::storage)?;
        decode_documents(found)
    }

    pub async fn find_one(&self, filter: &Filter) -> YearbookResult<Option<D>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    async fn put(&self, record: &D) -> YearbookResult<D> {
        let stored = self
            .storage
            .put(record.storage_key(), serde_json::to_value(record)?)
            .await
            .map_err(YearbookError::storage)?;
        Ok(serde_json::from_value(stored)?)
    }
}
