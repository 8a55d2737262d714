use crate::error::YearbookResult;
use crate::models::Student;
use crate::repository::ScopedRepository;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::ResolvedTenant;

pub type StudentRepository<S> = ScopedRepository<S, Student>;

impl<S: StorageProvider> ScopedRepository<S, Student> {
    /// Point lookup by department and reference number.
    pub async fn find_by_reference(
        &self,
        tenant: &ResolvedTenant,
        reference_number: &str,
    ) -> YearbookResult<Option<Student>> {
        self.find_one_in_tenant(tenant, reference_filter(reference_number))
            .await
    }

    pub async fn count_in_department(&self, tenant: &ResolvedTenant) -> YearbookResult<usize> {
        self.count_in_tenant(tenant, Filter::new()).await
    }
}

pub(crate) fn reference_filter(reference_number: &str) -> Filter {
    Filter::new().eq("referenceNumber", reference_number)
}
