//! Report operations.

use super::core::YearbookServer;
use crate::auth::AuthenticatedContext;
use crate::error::{ValidationError, YearbookError, YearbookResult};
use crate::models::{Report, ReportSubmission, report::{NO_STUDENT_EMAIL, UNKNOWN_STUDENT_NAME}};
use crate::storage::StorageProvider;
use crate::tenant::{ObjectId, RequestContext, ResolvedTenant, TenantFields};
use log::{debug, info};

impl<S: StorageProvider> YearbookServer<S> {
    /// File a report about a student.
    ///
    /// The department is the caller's when `caller` is present, otherwise
    /// the one named by `departmentSlug`. The student must exist there;
    /// their name is copied into the report.
    pub async fn create_report(
        &self,
        request: ReportSubmission,
        caller: Option<&AuthenticatedContext>,
        context: &RequestContext,
    ) -> YearbookResult<Report> {
        request.validate()?;

        let department = match (caller, request.department_slug.as_deref()) {
            (Some(caller), _) => self.caller_department(caller).await?,
            (None, Some(slug)) if !slug.trim().is_empty() => {
                self.department_by_slug(slug.trim()).await?
            }
            _ => return Err(ValidationError::missing("departmentSlug").into()),
        };
        let tenant = ResolvedTenant::of(&department);
        let reference_number = request.reference_number.trim();

        let student = self
            .students
            .find_by_reference(&tenant, reference_number)
            .await?
            .ok_or_else(|| YearbookError::not_found("Student", reference_number))?;

        let now = self.now();
        let student_name = if student.name.is_empty() {
            UNKNOWN_STUDENT_NAME.to_string()
        } else {
            student.name
        };
        let report = Report {
            id: ObjectId::new(),
            title: request.title.trim().to_string(),
            content: request.content.trim().to_string(),
            student_name,
            student_email: NO_STUDENT_EMAIL.to_string(),
            reference_number: student.reference_number,
            tenant: TenantFields::canonical(department.id),
            resolved: false,
            created_at: now,
            updated_at: now,
        };
        let report = self.reports.insert(&report).await?;

        info!(
            "Report {} filed for student {} in {} (request: '{}')",
            report.id, report.reference_number, department.slug, context.request_id
        );
        Ok(report)
    }

    /// Reports of the caller's department, newest first.
    pub async fn list_reports(&self, context: &AuthenticatedContext) -> YearbookResult<Vec<Report>> {
        let tenant = self.caller_tenant(context).await?;
        let mut reports = self.reports.in_tenant(&tenant).await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(
            "Listed {} reports (request: '{}')",
            reports.len(),
            context.request_id()
        );
        Ok(reports)
    }

    pub async fn get_report(
        &self,
        context: &AuthenticatedContext,
        report_id: ObjectId,
    ) -> YearbookResult<Report> {
        let department = self.caller_department(context).await?;
        self.reports
            .get_owned(report_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Report", report_id.to_hex()))
    }

    /// Flip the `resolved` flag of a report.
    pub async fn toggle_report(
        &self,
        context: &AuthenticatedContext,
        report_id: ObjectId,
    ) -> YearbookResult<Report> {
        let mut report = self.get_report(context, report_id).await?;
        report.resolved = !report.resolved;
        report.updated_at = self.now();
        let report = self.reports.save(&report).await?;

        info!(
            "Report {} {} (request: '{}')",
            report.id,
            if report.resolved {
                "resolved"
            } else {
                "marked as unresolved"
            },
            context.request_id()
        );
        Ok(report)
    }

    pub async fn delete_report(
        &self,
        context: &AuthenticatedContext,
        report_id: ObjectId,
    ) -> YearbookResult<Report> {
        let report = self.get_report(context, report_id).await?;
        self.reports.delete(report.id).await?;
        info!(
            "Deleted report {} (request: '{}')",
            report.id,
            context.request_id()
        );
        Ok(report)
    }
}
