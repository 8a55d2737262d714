use crate::error::YearbookResult;
use crate::models::{Department, Document, TenantScoped};
use crate::repository::Collection;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::{ObjectId, ResolvedTenant, TenantKeyResolver};
use std::ops::Deref;
use std::sync::Arc;

/// Repository for records owned by a department.
///
/// Dereferences to the underlying [`Collection`] for id-based access.
pub struct ScopedRepository<S, D> {
    collection: Collection<S, D>,
    resolver: TenantKeyResolver<S>,
}

impl<S, D> Clone for ScopedRepository<S, D> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<S, D> Deref for ScopedRepository<S, D> {
    type Target = Collection<S, D>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl<S: StorageProvider, D: Document + TenantScoped> ScopedRepository<S, D> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            collection: Collection::new(Arc::clone(&storage)),
            resolver: TenantKeyResolver::new(storage),
        }
    }

    /// Every record in the tenant.
    pub async fn in_tenant(&self, tenant: &ResolvedTenant) -> YearbookResult<Vec<D>> {
        self.resolver.find_scoped(tenant, Filter::new()).await
    }

    /// Records in the tenant that also match `filter`.
    pub async fn find_in_tenant(
        &self,
        tenant: &ResolvedTenant,
        filter: Filter,
    ) -> YearbookResult<Vec<D>> {
        self.resolver.find_scoped(tenant, filter).await
    }

    /// The record in the tenant matching `filter`.
    pub async fn find_one_in_tenant(
        &self,
        tenant: &ResolvedTenant,
        filter: Filter,
    ) -> YearbookResult<Option<D>> {
        self.resolver.find_one_scoped(tenant, filter).await
    }

    pub async fn count_in_tenant(&self, tenant: &ResolvedTenant, filter: Filter) -> YearbookResult<usize> {
        self.resolver.count_scoped::<D>(tenant, filter).await
    }

    /// The record with `id` if it belongs to `department`.
    ///
    /// Returns `Ok(None)` both when the record is missing and when another
    /// department owns it.
    pub async fn get_owned(&self, id: ObjectId, department: &Department) -> YearbookResult<Option<D>> {
        Ok(self
            .collection
            .get(id)
            .await?
            .filter(|record| record.belongs_to(department)))
    }
}
