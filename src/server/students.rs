//! Student operations.
//!
//! Students have no credentials. Admins manage them by reference number
//! within their own department; students fill in their own profile once,
//! identified by department slug and reference number.

use super::core::YearbookServer;
use super::responses::BulkStudentsOutcome;
use crate::auth::AuthenticatedContext;
use crate::error::{YearbookError, YearbookResult};
use crate::models::{BulkStudents, NewStudent, Student, StudentAdminUpdate, StudentProfileUpdate};
use crate::storage::StorageProvider;
use crate::tenant::{ObjectId, RequestContext, ResolvedTenant, TenantIdentifier};
use log::{debug, info, warn};
use std::collections::HashSet;

impl<S: StorageProvider> YearbookServer<S> {
    /// Add one student to the caller's department.
    pub async fn create_student(
        &self,
        context: &AuthenticatedContext,
        request: NewStudent,
    ) -> YearbookResult<Student> {
        request.validate()?;
        let reference_number = request.reference_number.trim();
        let department = self.caller_department(context).await?;
        let tenant = ResolvedTenant::of(&department);

        let _guard = self.write_guard.lock().await;

        if self
            .students
            .find_by_reference(&tenant, reference_number)
            .await?
            .is_some()
        {
            return Err(YearbookError::conflict(
                "Student",
                "referenceNumber",
                reference_number,
            ));
        }

        let student = self
            .students
            .insert(&Student::new(reference_number, department.id, self.now()))
            .await?;

        info!(
            "Added student {} to department {} (request: '{}')",
            student.reference_number,
            department.slug,
            context.request_id()
        );
        Ok(student)
    }

    /// Add many students, reporting each number's outcome.
    ///
    /// Numbers already in the department, or repeated within the request,
    /// are reported as already added. Numbers whose insert fails are
    /// reported as unadded and do not stop the import.
    pub async fn bulk_create_students(
        &self,
        context: &AuthenticatedContext,
        request: BulkStudents,
    ) -> YearbookResult<BulkStudentsOutcome> {
        request.validate()?;
        let department = self.caller_department(context).await?;
        let tenant = ResolvedTenant::of(&department);
        let mut outcome = BulkStudentsOutcome::default();
        let mut seen = HashSet::new();

        let _guard = self.write_guard.lock().await;

        for raw in &request.reference_numbers {
            let reference_number = raw.trim().to_string();
            if !seen.insert(reference_number.clone())
                || self
                    .students
                    .find_by_reference(&tenant, &reference_number)
                    .await?
                    .is_some()
            {
                outcome.already_added.push(reference_number);
                continue;
            }

            let student = Student::new(reference_number.as_str(), department.id, self.now());
            match self.students.insert(&student).await {
                Ok(_) => outcome.added.push(reference_number),
                Err(e) => {
                    warn!(
                        "Could not add student {} (request: '{}'): {}",
                        reference_number,
                        context.request_id(),
                        e
                    );
                    outcome.unadded.push(reference_number);
                }
            }
        }

        info!(
            "Bulk import into {}: {} added, {} already added, {} unadded (request: '{}')",
            department.slug,
            outcome.added.len(),
            outcome.already_added.len(),
            outcome.unadded.len(),
            context.request_id()
        );
        Ok(outcome)
    }

    /// Remove a student of the caller's department by reference number.
    pub async fn delete_student(
        &self,
        context: &AuthenticatedContext,
        reference_number: &str,
    ) -> YearbookResult<Student> {
        let tenant = self.caller_tenant(context).await?;
        let student = self
            .students
            .find_by_reference(&tenant, reference_number.trim())
            .await?
            .ok_or_else(|| YearbookError::not_found("Student", reference_number))?;

        self.students.delete(student.id).await?;
        info!(
            "Deleted student {} (request: '{}')",
            student.reference_number,
            context.request_id()
        );
        Ok(student)
    }

    /// Every student in a tenant. Unknown tenants have no students.
    pub async fn list_students(
        &self,
        identifier: &TenantIdentifier,
        context: &RequestContext,
    ) -> YearbookResult<Vec<Student>> {
        let tenant = self.resolver.resolve(identifier).await?;
        let students = self.students.in_tenant(&tenant).await?;
        debug!(
            "Listed {} students for {} (request: '{}')",
            students.len(),
            identifier,
            context.request_id
        );
        Ok(students)
    }

    /// Point lookup by tenant and reference number.
    pub async fn get_student(
        &self,
        identifier: &TenantIdentifier,
        reference_number: &str,
        context: &RequestContext,
    ) -> YearbookResult<Student> {
        debug!(
            "Fetching student {} in {} (request: '{}')",
            reference_number, identifier, context.request_id
        );
        let tenant = self.resolver.resolve(identifier).await?;
        self.students
            .find_by_reference(&tenant, reference_number.trim())
            .await?
            .ok_or_else(|| YearbookError::not_found("Student", reference_number))
    }

    /// Student self-service profile update.
    ///
    /// Allowed once: after the profile has a name, further attempts fail
    /// with a conflict.
    pub async fn update_student_profile(
        &self,
        request: StudentProfileUpdate,
        context: &RequestContext,
    ) -> YearbookResult<Student> {
        request.validate()?;
        let department = self.department_by_slug(request.department_slug.trim()).await?;
        let tenant = ResolvedTenant::of(&department);
        let reference_number = request.reference_number.trim();

        let _guard = self.write_guard.lock().await;

        let mut student = self
            .students
            .find_by_reference(&tenant, reference_number)
            .await?
            .ok_or_else(|| YearbookError::not_found("Student", reference_number))?;

        if student.has_profile() {
            return Err(YearbookError::conflict(
                "Student",
                "profile",
                reference_number,
            ));
        }

        student.name = request.name.trim().to_string();
        student.nickname = request.nickname.trim().to_string();
        student.image = request.image.trim().to_string();
        student.phone_number = request.phone_number.trim().to_string();
        student.quote = request.quote.trim().to_string();
        let student = self.students.save(&student).await?;

        info!(
            "Student {} of {} completed their profile (request: '{}')",
            student.reference_number, department.slug, context.request_id
        );
        Ok(student)
    }

    /// Admin edit of a student of the caller's department.
    pub async fn admin_update_student(
        &self,
        context: &AuthenticatedContext,
        student_id: ObjectId,
        request: StudentAdminUpdate,
    ) -> YearbookResult<Student> {
        request.validate()?;
        let department = self.caller_department(context).await?;
        let mut student = self
            .students
            .get_owned(student_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Student", student_id.to_hex()))?;

        if let Some(name) = request.name {
            student.name = name.trim().to_string();
        }
        if let Some(nickname) = request.nickname {
            student.nickname = nickname.trim().to_string();
        }
        if let Some(image) = request.image {
            student.image = image.trim().to_string();
        }
        if let Some(phone_number) = request.phone_number {
            student.phone_number = phone_number.trim().to_string();
        }
        if let Some(quote) = request.quote {
            student.quote = quote.trim().to_string();
        }

        let student = self.students.save(&student).await?;
        info!(
            "Admin {} updated student {} (request: '{}')",
            context.admin_id(),
            student.reference_number,
            context.request_id()
        );
        Ok(student)
    }
}
