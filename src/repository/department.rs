use crate::error::YearbookResult;
use crate::models::Department;
use crate::repository::Collection;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::ObjectId;
use std::ops::Deref;
use std::sync::Arc;

/// Departments, looked up by id, slug or code.
pub struct DepartmentRepository<S> {
    collection: Collection<S, Department>,
}

impl<S> Clone for DepartmentRepository<S> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<S> Deref for DepartmentRepository<S> {
    type Target = Collection<S, Department>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl<S: StorageProvider> DepartmentRepository<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> YearbookResult<Option<Department>> {
        self.collection.get(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> YearbookResult<Option<Department>> {
        self.collection
            .find_one(&Filter::new().eq("slug", slug))
            .await
    }

    pub async fn find_by_code(&self, code: &str) -> YearbookResult<Option<Department>> {
        self.collection
            .find_one(&Filter::new().eq("code", code))
            .await
    }
}
