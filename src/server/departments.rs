//! Department operations.

use super::core::YearbookServer;
use crate::auth::AuthenticatedContext;
use crate::error::{YearbookError, YearbookResult};
use crate::models::{Department, NewDepartment};
use crate::statistics::DepartmentStatistics;
use crate::storage::StorageProvider;
use crate::tenant::{RequestContext, TenantIdentifier};
use log::{debug, info};

impl<S: StorageProvider> YearbookServer<S> {
    /// Create a department owned by the caller.
    pub async fn create_department(
        &self,
        context: &AuthenticatedContext,
        request: NewDepartment,
    ) -> YearbookResult<Department> {
        request.validate()?;
        let slug = request.slug();
        let code = request.code.trim().to_string();

        let _guard = self.write_guard.lock().await;

        if self.departments.find_by_slug(&slug).await?.is_some() {
            return Err(YearbookError::conflict("Department", "slug", slug));
        }
        if self.departments.find_by_code(&code).await?.is_some() {
            return Err(YearbookError::conflict("Department", "code", code));
        }

        let mut department = Department::new(request.name.trim(), code, slug, self.now());
        department.admin_id = context.admin_id().to_hex();
        let department = self.departments.insert(&department).await?;

        info!(
            "Created department {} '{}' (request: '{}')",
            department.id,
            department.slug,
            context.request_id()
        );
        Ok(department)
    }

    pub async fn list_departments(&self, context: &RequestContext) -> YearbookResult<Vec<Department>> {
        let departments = self.departments.all().await?;
        debug!(
            "Listed {} departments (request: '{}')",
            departments.len(),
            context.request_id
        );
        Ok(departments)
    }

    pub async fn get_department_by_slug(
        &self,
        slug: &str,
        context: &RequestContext,
    ) -> YearbookResult<Department> {
        debug!("Fetching department '{}' (request: '{}')", slug, context.request_id);
        self.department_by_slug(slug).await
    }

    /// Summary counts for a department the caller administers.
    pub async fn department_statistics(
        &self,
        context: &AuthenticatedContext,
        identifier: &TenantIdentifier,
    ) -> YearbookResult<DepartmentStatistics> {
        let department = self
            .resolver
            .department_for(identifier)
            .await?
            .ok_or_else(|| YearbookError::not_found("Department", identifier.as_str()))?;

        if department.id != context.department_id() {
            return Err(YearbookError::forbidden(
                "You can only view statistics of your department",
            ));
        }

        let statistics = self
            .statistics
            .for_department(&department, self.today())
            .await?;
        debug!(
            "Statistics for {}: {:?} (request: '{}')",
            department.slug,
            statistics,
            context.request_id()
        );
        Ok(statistics)
    }
}
